pub mod question;

pub use question::{QuestionRow, TYPE_MULTIPLE_CHOICE, TYPE_OPEN_ENDED};

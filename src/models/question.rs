//! 试题数据模型
//!
//! 一条记录对应一张截图中的一道试题。Extractor 产出的中间文档保留模型
//! 返回的原始 JSON 对象（缺字段就是缺字段），入库前由 `QuestionRow`
//! 统一补齐默认值。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 选择题类型标签
pub const TYPE_MULTIPLE_CHOICE: &str = "multiple_choice";
/// 解答题类型标签
pub const TYPE_OPEN_ENDED: &str = "open_ended";

/// 归一化后的试题行，与远程表 questions 的列一一对应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRow {
    /// 题号（原卷中的位置），缺失时入库为 NULL
    pub number: Option<i64>,
    /// 分值，缺失时入库为 NULL
    pub points: Option<i64>,
    /// 所属知识点（格鲁吉亚语标签，如 "ალგებრა"）
    pub topic: String,
    #[serde(rename = "type")]
    pub question_type: String,
    /// 题干正文，数学公式为 LaTeX 标记
    pub latex: String,
    /// 选项列表，仅选择题非空
    #[serde(default)]
    pub options: Vec<String>,
    pub has_image: bool,
    /// 为将来图片托管保留，本管线中恒为空串
    pub image_url: String,
}

impl QuestionRow {
    /// 从模型返回的原始 JSON 对象构造归一化行
    ///
    /// 缺失字段按固定默认值补齐：topic→"General"、type→"open_ended"、
    /// latex→""、options→[]、has_image→false。image_url 无论输入为何
    /// 一律置空。非选择题的 options 一律清空。
    pub fn from_value(raw: &Value) -> Self {
        let question_type = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(TYPE_OPEN_ENDED)
            .to_string();

        let options = if question_type == TYPE_MULTIPLE_CHOICE {
            raw.get("options")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Self {
            number: raw.get("number").and_then(Value::as_i64),
            points: raw.get("points").and_then(Value::as_i64),
            topic: raw
                .get("topic")
                .and_then(Value::as_str)
                .unwrap_or("General")
                .to_string(),
            question_type,
            latex: raw
                .get("latex")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            options,
            has_image: raw.get("has_image").and_then(Value::as_bool).unwrap_or(false),
            image_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let raw = json!({
            "number": 7,
            "points": 2,
            "topic": "გეომეტრია",
            "type": "multiple_choice",
            "latex": "იპოვეთ $x$",
            "options": ["ა) 5", "ბ) 7", "გ) 9", "დ) 11"],
            "has_image": true,
            "image_url": "https://example.com/should-be-dropped.png"
        });

        let row = QuestionRow::from_value(&raw);

        assert_eq!(row.number, Some(7));
        assert_eq!(row.points, Some(2));
        assert_eq!(row.topic, "გეომეტრია");
        assert_eq!(row.question_type, TYPE_MULTIPLE_CHOICE);
        assert_eq!(row.latex, "იპოვეთ $x$");
        assert_eq!(row.options.len(), 4);
        assert!(row.has_image);
        // image_url 为保留字段，输入值必须被丢弃
        assert_eq!(row.image_url, "");
    }

    #[test]
    fn test_from_value_missing_fields_get_defaults() {
        let raw = json!({ "number": 3 });

        let row = QuestionRow::from_value(&raw);

        assert_eq!(row.number, Some(3));
        assert_eq!(row.points, None);
        assert_eq!(row.topic, "General");
        assert_eq!(row.question_type, TYPE_OPEN_ENDED);
        assert_eq!(row.latex, "");
        assert!(row.options.is_empty());
        assert!(!row.has_image);
        assert_eq!(row.image_url, "");
    }

    #[test]
    fn test_from_value_open_ended_clears_options() {
        // 模型偶尔会给解答题也返回选项，归一化后必须为空
        let raw = json!({
            "type": "open_ended",
            "options": ["ა) 5", "ბ) 7"]
        });

        let row = QuestionRow::from_value(&raw);

        assert!(row.options.is_empty());
    }

    #[test]
    fn test_serialized_row_uses_type_column_name() {
        let row = QuestionRow::from_value(&json!({ "type": "multiple_choice" }));
        let serialized = serde_json::to_value(&row).unwrap();

        assert_eq!(serialized["type"], "multiple_choice");
        assert!(serialized.get("question_type").is_none());
        // 缺失的题号以 null 入库，而不是编造默认值
        assert!(serialized["number"].is_null());
    }
}

// ==========================================
// 库存作业列表引擎 - 日期序列化
// ==========================================
// REST 载荷中的日期可能是 "2023-05-01"，也可能是完整时间戳
// "2023-05-01T10:00:00.000+0000"，统一取日期前缀
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// 存储/传输统一日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 宽松解析：取前 10 个字符按 YYYY-MM-DD 解析
pub fn parse_lenient(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let prefix = trimmed.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient(&raw).ok_or_else(|| serde::de::Error::custom(format!("无法解析日期: {}", raw)))
}

/// `Option<NaiveDate>` 版本，null/缺省均为 None
pub mod option {
    use super::{parse_lenient, DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_lenient(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("无法解析日期: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_accepts_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        assert_eq!(parse_lenient("2023-05-01"), Some(expected));
        assert_eq!(parse_lenient("2023-05-01T10:00:00.000+0000"), Some(expected));
        assert_eq!(parse_lenient(" 2023-05-01 "), Some(expected));
    }

    #[test]
    fn test_parse_lenient_rejects_garbage() {
        assert_eq!(parse_lenient(""), None);
        assert_eq!(parse_lenient("05/01/2023"), None);
        assert_eq!(parse_lenient("2023-13-01"), None);
    }
}

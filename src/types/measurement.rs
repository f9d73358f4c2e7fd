use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 三轴读数（原始传感器单位）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 测量序号，可能是整数也可能是字符串
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementNumber {
    Index(i64),
    Label(String),
}

impl fmt::Display for MeasurementNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementNumber::Index(n) => write!(f, "{}", n),
            MeasurementNumber::Label(s) => f.write_str(s),
        }
    }
}

/// One decoded telemetry sample. Missing channels are all-zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementRecord {
    pub measurement_number: Option<MeasurementNumber>,
    pub acceleration: Axes,
    pub angular_velocity: Axes,
}

impl MeasurementRecord {
    pub fn new(measurement_number: i64, acceleration: Axes, angular_velocity: Axes) -> Self {
        Self {
            measurement_number: Some(MeasurementNumber::Index(measurement_number)),
            acceleration,
            angular_velocity,
        }
    }

    /// Decodes one element of the fetched array.
    ///
    /// Only non-object elements are an error here; the pipeline replaces them
    /// with a zero record. A channel with the wrong shape is all-zero on its
    /// own and leaves the rest of the record intact.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a measurement object, got {}",
                json_kind(value)
            )));
        }
        RawRecord::deserialize(value).map(Self::from)
    }

    /// 图表横轴标签；缺少序号时使用 1 起始的位置
    pub fn label(&self, position: usize) -> String {
        match &self.measurement_number {
            Some(number) => format!("Measurement {}", number),
            None => format!("Measurement {}", position + 1),
        }
    }
}

/// JSON 类型名，用于错误信息
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    measurement_number: Option<MeasurementNumber>,
    #[serde(default, deserialize_with = "lenient_object")]
    data: Option<RawChannels>,
    // 兼容通道直接放在顶层的格式
    #[serde(default, alias = "acceleration", deserialize_with = "lenient_object")]
    acc: Option<RawAxes>,
    #[serde(default, alias = "angularVelocity", deserialize_with = "lenient_object")]
    gyro: Option<RawAxes>,
}

#[derive(Deserialize)]
struct RawChannels {
    #[serde(default, alias = "acceleration", deserialize_with = "lenient_object")]
    acc: Option<RawAxes>,
    #[serde(default, alias = "angularVelocity", deserialize_with = "lenient_object")]
    gyro: Option<RawAxes>,
}

#[derive(Deserialize, Clone, Copy)]
struct RawAxes {
    #[serde(default, deserialize_with = "lenient_f64")]
    x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    y: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    z: f64,
}

impl From<RawAxes> for Axes {
    fn from(raw: RawAxes) -> Self {
        Axes::new(raw.x, raw.y, raw.z)
    }
}

impl From<RawRecord> for MeasurementRecord {
    fn from(raw: RawRecord) -> Self {
        let (nested_acc, nested_gyro) = match raw.data {
            Some(channels) => (channels.acc, channels.gyro),
            None => (None, None),
        };

        Self {
            measurement_number: raw.measurement_number,
            acceleration: nested_acc.or(raw.acc).map(Axes::from).unwrap_or_default(),
            angular_velocity: nested_gyro.or(raw.gyro).map(Axes::from).unwrap_or_default(),
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// null、缺失或无法解析的轴值一律按 0 处理
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number).unwrap_or(0.0))
}

// 通道不是对象时视为缺失，不影响同一条记录的其他字段
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .and_then(|v| T::deserialize(v).ok()))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<MeasurementNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(match n.as_i64() {
            Some(i) => MeasurementNumber::Index(i),
            None => MeasurementNumber::Label(n.to_string()),
        }),
        Some(Value::String(s)) => Some(MeasurementNumber::Label(s)),
        Some(other) => Some(MeasurementNumber::Label(other.to_string())),
    })
}

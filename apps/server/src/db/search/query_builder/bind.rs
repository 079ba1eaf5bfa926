use chrono::{DateTime, Utc};

use super::BindValue;

pub(super) fn push_text(bind_params: &mut Vec<BindValue>, value: String) -> usize {
    bind_params.push(BindValue::Text(value));
    bind_params.len()
}

pub(super) fn push_float(bind_params: &mut Vec<BindValue>, value: f64) -> usize {
    bind_params.push(BindValue::Float(value));
    bind_params.len()
}

pub(super) fn push_int(bind_params: &mut Vec<BindValue>, value: i64) -> usize {
    bind_params.push(BindValue::Int(value));
    bind_params.len()
}

pub(super) fn push_bool(bind_params: &mut Vec<BindValue>, value: bool) -> usize {
    bind_params.push(BindValue::Bool(value));
    bind_params.len()
}

pub(super) fn push_timestamp(bind_params: &mut Vec<BindValue>, value: DateTime<Utc>) -> usize {
    bind_params.push(BindValue::Timestamp(value));
    bind_params.len()
}

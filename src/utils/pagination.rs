use serde_json::Value;

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_OFFSET: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Pagination {
    /// Coerces raw `limit`/`offset` payload values.
    ///
    /// `None` means the key was absent and takes its default. A present value is
    /// accepted as an integer, an integral-or-truncated float, a numeric string
    /// or a boolean. If either present value fails (including `null` and
    /// negatives) both fall back to the defaults.
    pub fn coerce(limit: Option<&Value>, offset: Option<&Value>) -> Self {
        match (
            coerce_count(limit, DEFAULT_LIMIT),
            coerce_count(offset, DEFAULT_OFFSET),
        ) {
            (Some(limit), Some(offset)) => Self { limit, offset },
            _ => Self::default(),
        }
    }

    /// Row cap for the store query. A limit of `0` means no cap.
    pub fn row_limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }
}

fn coerce_count(value: Option<&Value>, default: u64) -> Option<u64> {
    let Some(value) = value else {
        return Some(default);
    };
    let parsed: i64 = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        })?,
        Value::String(s) => s.trim().parse().ok()?,
        Value::Bool(b) => i64::from(*b),
        _ => return None,
    };
    u64::try_from(parsed).ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(None, None, 10, 0)]
    #[case(Some(json!(5)), Some(json!(20)), 5, 20)]
    #[case(Some(json!("5")), Some(json!(" 2 ")), 5, 2)]
    #[case(Some(json!(7.9)), None, 7, 0)]
    #[case(Some(json!(true)), Some(json!(false)), 1, 0)]
    #[case(Some(json!(3)), None, 3, 0)]
    fn accepts_integer_like_values(
        #[case] limit: Option<Value>,
        #[case] offset: Option<Value>,
        #[case] expected_limit: u64,
        #[case] expected_offset: u64,
    ) {
        let page = Pagination::coerce(limit.as_ref(), offset.as_ref());
        assert_eq!(
            page,
            Pagination {
                limit: expected_limit,
                offset: expected_offset
            }
        );
    }

    #[rstest]
    #[case(Some(json!("ten")), Some(json!(4)))]
    #[case(Some(json!(5)), Some(json!("x")))]
    #[case(Some(json!(5)), Some(Value::Null))]
    #[case(Some(json!("5.0")), None)]
    #[case(Some(json!(-1)), Some(json!(3)))]
    #[case(Some(json!([1])), None)]
    fn any_failure_resets_both(#[case] limit: Option<Value>, #[case] offset: Option<Value>) {
        assert_eq!(
            Pagination::coerce(limit.as_ref(), offset.as_ref()),
            Pagination::default()
        );
    }

    #[rstest]
    #[case(json!(0), None)]
    #[case(json!("0"), None)]
    #[case(json!(false), None)]
    #[case(json!(4), Some(4))]
    fn zero_limit_is_unbounded(#[case] limit: Value, #[case] expected: Option<u64>) {
        let page = Pagination::coerce(Some(&limit), None);
        assert_eq!(page.row_limit(), expected);
    }
}

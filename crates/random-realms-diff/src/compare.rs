use serde_json::{Map, Number, Value};

use crate::model::Difference;

/// Deep-compare two dumps and list every differing leaf.
///
/// Integers compare exactly. A float equals an integer only when it is
/// integral, within the 2^53 range a double holds exactly, and converts back
/// to that same integer, so `1` and `1.0` are equal. Arrays compare
/// element by element; extra elements on either side are differences.
pub fn compare_dumps(expected: &Value, actual: &Value) -> Vec<Difference> {
    let mut differences = Vec::new();
    compare_at(String::new(), expected, actual, &mut differences);
    differences
}

fn compare_at(path: String, expected: &Value, actual: &Value, out: &mut Vec<Difference>) {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            compare_objects(&path, expected, actual, out);
        }
        (Value::Array(expected), Value::Array(actual)) => {
            let len = expected.len().max(actual.len());
            for index in 0..len {
                let child = format!("{path}/{index}");
                match (expected.get(index), actual.get(index)) {
                    (Some(expected), Some(actual)) => compare_at(child, expected, actual, out),
                    (expected, actual) => out.push(Difference {
                        path: child,
                        expected: expected.cloned(),
                        actual: actual.cloned(),
                    }),
                }
            }
        }
        (Value::Number(expected), Value::Number(actual)) if numbers_equal(expected, actual) => {}
        _ if expected == actual => {}
        _ => out.push(Difference {
            path,
            expected: Some(expected.clone()),
            actual: Some(actual.clone()),
        }),
    }
}

fn compare_objects(
    path: &str,
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
    out: &mut Vec<Difference>,
) {
    for (key, expected_value) in expected {
        let child = format!("{path}/{}", escape_pointer(key));
        match actual.get(key) {
            Some(actual_value) => compare_at(child, expected_value, actual_value, out),
            None => out.push(Difference {
                path: child,
                expected: Some(expected_value.clone()),
                actual: None,
            }),
        }
    }
    for (key, actual_value) in actual {
        if !expected.contains_key(key) {
            out.push(Difference {
                path: format!("{path}/{}", escape_pointer(key)),
                expected: None,
                actual: Some(actual_value.clone()),
            });
        }
    }
}

/// 2^53, the largest magnitude below which every integer is a double.
const MAX_EXACT_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    match (integer_value(expected), integer_value(actual)) {
        (Some(expected), Some(actual)) => expected == actual,
        (Some(integer), None) => float_matches_integer(actual.as_f64(), integer),
        (None, Some(integer)) => float_matches_integer(expected.as_f64(), integer),
        (None, None) => expected.as_f64() == actual.as_f64(),
    }
}

fn integer_value(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn float_matches_integer(float: Option<f64>, integer: i128) -> bool {
    float.is_some_and(|float| {
        float.fract() == 0.0 && float.abs() <= MAX_EXACT_FLOAT_INTEGER && float as i128 == integer
    })
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

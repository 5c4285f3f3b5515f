//! Field histogram results and their reshaping into plot points.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Histogram of a numeric field, bucketed by timestamp.
///
/// `results` maps a string-encoded epoch timestamp to the named statistics
/// of that bucket (`count`, `mean`, `total`, ...).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldHistogramResponse {
    #[serde(default)]
    pub interval: Option<String>,
    /// Server-side computation time in milliseconds.
    #[serde(default)]
    pub time: Option<u64>,
    #[serde(default)]
    pub built_query: Option<String>,
    #[serde(default)]
    pub results: Map<String, Value>,
}

/// One point of a plotted series, serialized as `{"x": .., "y": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub x: i64,
    pub y: Option<Value>,
}

impl FieldHistogramResponse {
    /// Reshape into `[{x: timestamp, y: value}, ...]`.
    ///
    /// Points follow the iteration order of `results`, which is the order
    /// the server sent them in. No sorting is performed.
    pub fn formatted_results(&self, value_key: &str) -> Result<Vec<HistogramPoint>, ApiError> {
        let mut points = Vec::with_capacity(self.results.len());

        for (key, bucket) in &self.results {
            let x = key
                .parse::<i64>()
                .map_err(|e| ApiError::Parse(format!("histogram key {:?}: {}", key, e)))?;
            let y = bucket.get(value_key).cloned();

            points.push(HistogramPoint { x, y });
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn histogram(results: Value) -> FieldHistogramResponse {
        serde_json::from_value(json!({
            "interval": "minute",
            "time": 12,
            "results": results
        }))
        .unwrap()
    }

    #[test]
    fn test_formatted_results_in_input_order() {
        let response = histogram(json!({"100": {"count": 5}, "200": {"count": 7}}));

        let points = response.formatted_results("count").unwrap();
        assert_eq!(
            points,
            vec![
                HistogramPoint { x: 100, y: Some(json!(5)) },
                HistogramPoint { x: 200, y: Some(json!(7)) },
            ]
        );
    }

    #[test]
    fn test_formatted_results_are_not_sorted() {
        let response = histogram(json!({"300": {"mean": 1.5}, "100": {"mean": 2.5}}));

        let xs: Vec<i64> = response
            .formatted_results("mean")
            .unwrap()
            .iter()
            .map(|p| p.x)
            .collect();
        assert_eq!(xs, vec![300, 100]);
    }

    #[test]
    fn test_missing_value_key_yields_null() {
        let response = histogram(json!({"100": {"count": 5}}));

        let points = response.formatted_results("max").unwrap();
        assert_eq!(points[0].y, None);
        assert_eq!(
            serde_json::to_value(&points).unwrap(),
            json!([{"x": 100, "y": null}])
        );
    }

    #[test]
    fn test_negative_timestamps_parse() {
        let response = histogram(json!({"-1893456000": {"total": 92228531}}));

        let points = response.formatted_results("total").unwrap();
        assert_eq!(points[0].x, -1893456000);
    }

    #[test]
    fn test_non_integer_key_fails() {
        let response = histogram(json!({"100": {"count": 1}, "yesterday": {"count": 2}}));

        let err = response.formatted_results("count").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}

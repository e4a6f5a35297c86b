//! Label text extraction metrics.

use metrics::{counter, histogram};

pub struct LabelMetrics;

impl LabelMetrics {
    pub fn record_extraction(outcome: &str, image_bytes: usize) {
        counter!("label_extractions_total", "outcome" => outcome.to_string()).increment(1);
        histogram!("label_image_bytes").record(image_bytes as f64);
    }
}

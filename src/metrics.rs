use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics collection and management
///
/// Metric names are held in one place so dashboards and alerts have a single
/// source of truth. Recording is a no-op until the embedding process installs
/// a recorder.
pub struct MetricsCollector {
    // Database metrics
    pub db_operations_total: &'static str,
    pub db_operation_duration: &'static str,
    pub db_connection_pool_size: &'static str,

    // Stats engine metrics
    pub generations_total: &'static str,
    pub streak_resets_total: &'static str,

    // Engagement metrics
    pub engagement_writes_total: &'static str,

    // Feed metrics
    pub feed_pages_total: &'static str,
    pub feed_page_duration: &'static str,
    pub feed_page_items: &'static str,

    // Leaderboard metrics
    pub leaderboard_queries_total: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            db_operations_total: "prompt_social_db_operations_total",
            db_operation_duration: "prompt_social_db_operation_duration_seconds",
            db_connection_pool_size: "prompt_social_db_connection_pool_size",

            generations_total: "prompt_social_generations_total",
            streak_resets_total: "prompt_social_streak_resets_total",

            engagement_writes_total: "prompt_social_engagement_writes_total",

            feed_pages_total: "prompt_social_feed_pages_total",
            feed_page_duration: "prompt_social_feed_page_duration_seconds",
            feed_page_items: "prompt_social_feed_page_items",

            leaderboard_queries_total: "prompt_social_leaderboard_queries_total",

            errors_total: "prompt_social_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record database operation metrics
    pub fn record_db_operation(&self, operation: &str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(self.db_operations_total, "operation" => operation.to_string(), "status" => status)
            .increment(1);
        histogram!(self.db_operation_duration, "operation" => operation.to_string())
            .record(duration.as_secs_f64());

        if !success {
            counter!(self.errors_total, "type" => "database").increment(1);
        }
    }

    /// Record a generation event processed by the stats engine
    pub fn record_generation(&self, streak_reset: bool) {
        counter!(self.generations_total).increment(1);
        if streak_reset {
            counter!(self.streak_resets_total).increment(1);
        }
    }

    /// Record an engagement write (like or comment)
    pub fn record_engagement_write(&self, kind: &'static str) {
        counter!(self.engagement_writes_total, "kind" => kind).increment(1);
    }

    /// Record feed page assembly metrics
    pub fn record_feed_page(&self, source: &'static str, items: usize, duration: Duration) {
        counter!(self.feed_pages_total, "source" => source).increment(1);
        histogram!(self.feed_page_duration, "source" => source).record(duration.as_secs_f64());
        histogram!(self.feed_page_items, "source" => source).record(items as f64);
    }

    /// Record a leaderboard query
    pub fn record_leaderboard_query(&self, metric: &'static str) {
        counter!(self.leaderboard_queries_total, "metric" => metric).increment(1);
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &str, operation: &str) {
        counter!(
            self.errors_total,
            "type" => error_type.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    /// Update connection pool size
    pub fn update_connection_pool_size(&self, size: usize) {
        gauge!(self.db_connection_pool_size).set(size as f64);
    }
}

/// Performance timing wrapper for metrics
pub struct MetricsTimer {
    collector: MetricsCollector,
    operation: String,
    start: std::time::Instant,
}

impl MetricsTimer {
    pub fn new(collector: MetricsCollector, operation: &str) -> Self {
        Self {
            collector,
            operation: operation.to_string(),
            start: std::time::Instant::now(),
        }
    }

    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed();
        self.collector.record_db_operation(&self.operation, duration, success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.db_operations_total, "prompt_social_db_operations_total");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let collector = MetricsCollector::default();
        collector.record_db_operation("insert", Duration::from_millis(3), true);
        collector.record_feed_page("home", 10, Duration::from_millis(12));
        collector.record_generation(false);
    }
}

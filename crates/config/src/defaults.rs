pub fn default_min_increment() -> f64 {
    1.0
}

pub fn default_tick_interval_ms() -> u64 {
    250
}

pub fn default_queue_capacity() -> usize {
    256
}

pub fn default_recent_bids_retained() -> usize {
    1000
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}

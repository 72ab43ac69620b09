pub mod api;
pub mod core;
pub mod pipeline;
pub mod redaction;
pub mod scoring;

/// 初始化日志，Android 上输出到 logcat，其他平台由宿主决定
pub fn init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("parking_lib"),
        );
    }
}

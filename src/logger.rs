use log::LevelFilter;

/// Crates that log every frame at debug level.
const QUIET_TARGETS: [&str; 6] = ["wgpu_core", "wgpu_hal", "naga", "iced_wgpu", "cosmic_text", "winit"];

pub fn setup(is_debug: bool) -> Result<(), fern::InitError> {
    let level = if is_debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}:[{}:{}] -- {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level);

    for target in QUIET_TARGETS {
        dispatch = dispatch.level_for(target, LevelFilter::Warn);
    }

    dispatch.chain(std::io::stdout()).apply()?;
    Ok(())
}

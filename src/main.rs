fn main() {
    if let Err(e) = py_packager_lib::run() {
        // 日志未初始化（如配置错误）时直接输出到 stderr
        if log::max_level() == log::LevelFilter::Off {
            eprintln!("错误：{}", e);
        } else {
            log::error!("{}", e);
        }
        std::process::exit(1);
    }
}

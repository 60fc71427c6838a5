use actix_web::{middleware, web, App, HttpServer};
use log::info;
use mangadex_proxy::app_state::AppState;
use mangadex_proxy::config::Config;
use mangadex_proxy::routes;

fn init_logging() {
    if log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        return;
    }

    use log4rs::append::console::ConsoleAppender;
    use log4rs::config::{Appender, Config as LogConfig, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    match LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(log::LevelFilter::Info))
    {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Failed to initialise logging: {}", e);
            }
        }
        Err(e) => eprintln!("Invalid fallback logging config: {}", e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let cfg = Config::load();
    let state = AppState::new(cfg.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("MangaDex client initialized:");
    info!("  API: {}", cfg.upstream.api_base_url);
    info!("  Timeout: {}s", cfg.upstream.timeout_secs);
    info!("  Languages: {}", cfg.upstream.translated_languages.join(", "));

    let data = web::Data::new(state);
    let base_path = cfg.server.base_path.trim_end_matches('/').to_string();

    // Try to bind to an available port in the configured range
    let mut last_err: Option<std::io::Error> = None;
    for port in cfg.server.port_start..=cfg.server.port_end {
        let data_clone = data.clone();
        let base = base_path.clone();
        let addr = format!("{}:{}", cfg.server.host, port);
        match HttpServer::new(move || {
            App::new()
                .app_data(data_clone.clone())
                .wrap(middleware::Logger::default())
                .service(web::scope(&base).configure(routes::configure))
        })
        .bind(&addr)
        {
            Ok(server) => {
                info!("Listening on {}{}", addr, base_path);
                return server.run().await;
            }
            Err(e) => {
                last_err = Some(e);
                continue;
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            format!(
                "No available ports {}-{}",
                cfg.server.port_start, cfg.server.port_end
            ),
        )
    }))
}

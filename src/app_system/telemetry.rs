/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` is used. Output goes
/// to stderr so the command line front end keeps stdout for the cart.
pub fn setup_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

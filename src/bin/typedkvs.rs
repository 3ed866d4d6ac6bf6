use typedkvs::cli::{self, Command};
use typedkvs::config::env;
use typedkvs::ErrorKind;

fn main() {
    // Install global collector configured based on TYPEDKVS_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env(env::LOG_DIRECTIVE))
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .on_thread_start(|| tracing::trace!("thread start"))
        .on_thread_stop(|| tracing::trace!("thread stop"))
        .enable_io()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to build runtime: {}", err);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        run().await;
    })
}

async fn run() {
    if let Err(err) = run_inner().await {
        let code = match err.kind() {
            ErrorKind::Store(_) | ErrorKind::Io(_) => 2,
            _ => 1,
        };
        eprintln!("{}", err);
        std::process::exit(code);
    };
}

async fn run_inner() -> typedkvs::Result<()> {
    let cli::TypedkvsCommand { client, command } = cli::parse();

    match command {
        Command::Get(get) => get.run(client).await,
        Command::Set(set) => set.run(client).await,
        Command::Delete(delete) => delete.run(client).await,
        Command::Index(index) => index.run(client).await,
        Command::Compile(compile) => compile.run(client).await,
    }
}

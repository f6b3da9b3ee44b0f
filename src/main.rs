mod api;
mod config;
mod error;
mod flows;
mod forms;
mod payload;
mod qr;
mod session;

#[cfg(feature = "cli")]
mod cli;
#[cfg(test)]
mod testing;
#[cfg(feature = "web")]
mod views;

#[cfg(not(any(feature = "cli", feature = "web")))]
compile_error!("enable the `cli` or the `web` feature");

#[cfg(feature = "web")]
use dioxus::prelude::*;

#[cfg(feature = "web")]
use views::{About, Balance, Login, Master, NotFound, Register};

#[cfg(feature = "web")]
#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/balance")]
    Balance {},
    #[route("/about")]
    About {},
    #[route("/master")]
    Master {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[cfg(feature = "web")]
impl From<flows::Destination> for Route {
    fn from(destination: flows::Destination) -> Self {
        match destination {
            flows::Destination::Login => Route::Login {},
            flows::Destination::Balance => Route::Balance {},
            flows::Destination::Admin => Route::Master {},
        }
    }
}

#[cfg(feature = "web")]
const MAIN_CSS: Asset = asset!("/assets/main.css");

#[cfg(feature = "web")]
#[component]
fn App() -> Element {
    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Script { src: qr::SCANNER_SCRIPT_URL }
        Router::<Route> {}
    }
}

#[cfg(feature = "web")]
fn main() {
    log::info!(
        "Starting bonus points client against {}",
        config::ClientConfig::from_build_env().backend_url()
    );
    dioxus::launch(App);
}

#[cfg(all(feature = "cli", not(feature = "web")))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;

    env_logger::init();
    let args = cli::Args::parse();
    cli::run(args).await
}

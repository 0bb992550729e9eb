mod api;
mod app;
mod config;
mod controllers;
mod models;
mod services;
mod ui;

use std::sync::Arc;

use clap::Parser;
use gtk::prelude::*;
use relm4::prelude::*;
use tracing_subscriber::EnvFilter;

use api::HttpChatApi;
use app::{App, AppInit};
use config::{ClientConfig, APP_ID};

const STYLE: &str = include_str!("../data/style.css");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::parse();
    let api = HttpChatApi::new(config.server_url.as_str())?;

    let app = adw::Application::builder().application_id(APP_ID).build();
    app.connect_startup(|_| {
        relm4::set_global_css(STYLE);
    });

    // Our flags were consumed by clap; GTK gets none.
    RelmApp::from_app(app).with_args(Vec::new()).run::<App>(AppInit {
        config,
        api: Arc::new(api),
    });
    Ok(())
}

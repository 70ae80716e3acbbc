#[cfg(feature = "ssr")]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    use actix_files::Files;
    use actix_web::*;
    use leptos::logging::log;
    use leptos::*;
    use leptos_actix::{generate_route_list, LeptosRoutes};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tutorhub::app::*;
    use tutorhub::config::{AppConfig, ClientConfig};
    use tutorhub::db::SqliteStorage;
    use tutorhub::services::Services;

    let config = AppConfig::from_env();
    let client_config = ClientConfig::from(&config);

    // Initialize the database
    let storage = SqliteStorage::new(&config.db_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    storage
        .create_schema()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log!("Schema created successfully!");
    if let Err(e) = storage.debug_dump() {
        log!("[DB] Could not dump database state: {}", e);
    }

    // Corrupt collections are quarantined; an unreadable database stops startup
    let services = Services::open(storage)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let services = Arc::new(Mutex::new(services));

    // Load configuration
    let conf = get_configuration(None)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let addr = conf.leptos_options.site_addr;

    // Generate the list of routes in your Leptos App
    let routes = generate_route_list(App);
    log!("listening on http://{}", &addr);

    // Start the Actix Web server
    HttpServer::new(move || {
        let leptos_options = &conf.leptos_options;
        let site_root = &leptos_options.site_root;
        let client_config = client_config.clone();

        App::new()
            .app_data(web::Data::new(services.clone()))
            // Register custom API routes BEFORE Leptos server functions
            .configure(tutorhub::api::configure::<SqliteStorage>)
            // Register server functions
            .route("/api/{tail:.*}", leptos_actix::handle_server_fns())
            // Serve JS/WASM/CSS from `pkg`
            .service(Files::new("/pkg", format!("{site_root}/pkg")))
            // Serve other assets from the `assets` directory
            .service(Files::new("/assets", site_root))
            // Serve the favicon from /favicon.ico
            .service(favicon)
            // Register Leptos routes, handing the browser its settings
            .leptos_routes_with_context(
                leptos_options.to_owned(),
                routes.to_owned(),
                move || provide_context(client_config.clone()),
                App,
            )
            // Pass Leptos options to the app
            .app_data(web::Data::new(leptos_options.to_owned()))
    })
    .bind(&addr)?
    .run()
    .await
}

#[cfg(feature = "ssr")]
#[actix_web::get("favicon.ico")]
async fn favicon(
    leptos_options: actix_web::web::Data<leptos::LeptosOptions>,
) -> actix_web::Result<actix_files::NamedFile> {
    let leptos_options = leptos_options.into_inner();
    let site_root = &leptos_options.site_root;
    Ok(actix_files::NamedFile::open(format!(
        "{site_root}/favicon.ico"
    ))?)
}

#[cfg(not(any(feature = "ssr", feature = "csr")))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}

#[cfg(all(not(feature = "ssr"), feature = "csr"))]
pub fn main() {
    // a client-side main function is required for using `trunk serve`
    // to run: `trunk serve --open --features csr`
    use tutorhub::app::*;

    console_error_panic_hook::set_once();

    leptos::mount_to_body(App);
}

use beacon::config::Config;
use beacon::http::response::StatusCode;
use beacon::server::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.verbosity.level_filter())
        .init();

    let mut server = Server::new(cfg);
    server
        .get("/hello", |_req, res| {
            res.set_content_type("text/plain");
            res.write("Hello from Beacon\n");
        })
        .get("/user/*", |req, res| {
            res.write(format!("<h1>User {}</h1>\n", req.arg(0).unwrap_or_default()));
        })
        .get("/user/*/edit", |req, res| {
            res.write(format!("<h1>Editing user {}</h1>\n", req.arg(0).unwrap_or_default()));
        })
        .post("/login", |req, res| match req.param("user") {
            Some(user) if !user.is_empty() => res.redirect(format!("/user/{user}")),
            _ => res.set_status(StatusCode::BadRequest),
        })
        .get("/old", |_req, res| res.redirect("/hello"));

    let shutdown = server.shutdown_handle();
    let serve = server.run();
    tokio::pin!(serve);

    tokio::select! {
        res = &mut serve => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            shutdown.shutdown();
            serve.await?;
        }
    }

    Ok(())
}

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

#[allow(dead_code)]
pub const HOME_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Compare Grocery Prices Across Local Stores Today</title>
  <meta name="description" content="Compare grocery prices across local stores.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta property="og:title" content="Grocery price comparison">
  <meta property="og:description" content="Find the cheapest basket near you.">
  <meta property="og:image" content="/og-image.png">
  <script type="application/ld+json">{"@context":"https://schema.org","@type":"WebSite","name":"Basket"}</script>
</head>
<body>
  <h1>Grocery price comparison</h1>
  <h2>How does it work?</h2>
  <p>Basket is a price comparison tool. Shoppers save 23% on average.</p>
  <a href="/faq">FAQ</a>
</body>
</html>"#;

#[allow(dead_code)]
pub const FAQ_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Grocery Savings FAQ</title>
  <script type="application/ld+json">{"@context":"https://schema.org","@type":"FAQPage"}</script>
</head>
<body>
  <h1>Frequently asked questions</h1>
  <h2>What is unit pricing?</h2>
  <p>Unit pricing means the price per kilogram.</p>
</body>
</html>"#;

async fn home() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(HOME_HTML)
}

async fn faq() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(FAQ_HTML)
}

async fn robots() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body("User-agent: *\nDisallow: /missing\n\nSitemap: /sitemap.xml\n")
}

async fn sitemap(req: HttpRequest) -> HttpResponse {
    let info = req.connection_info();
    let origin = format!("{}://{}", info.scheme(), info.host());
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         <url><loc>{origin}/</loc></url>\n\
         <url><loc>{origin}/faq</loc></url>\n\
         </urlset>"
    );
    HttpResponse::Ok().content_type("application/xml").body(body)
}

async fn og_image() -> HttpResponse {
    HttpResponse::Ok().content_type("image/png").finish()
}

/// Starts a fixture site on a random port and returns its origin.
///
/// Serves `/`, `/faq`, `/robots.txt`, `/sitemap.xml` and `/og-image.png`.
/// Everything else, including the manifest, is a 404.
pub async fn get_test_server_url() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route("/", web::get().to(home))
            .route("/faq", web::get().to(faq))
            .route("/robots.txt", web::get().to(robots))
            .route("/sitemap.xml", web::get().to(sitemap))
            .route("/og-image.png", web::route().to(og_image))
            .default_service(web::to(|| async {
                HttpResponse::NotFound().body("<html><body><h1>Not found</h1></body></html>")
            }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}

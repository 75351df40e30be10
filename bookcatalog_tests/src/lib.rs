use rand::Rng;



const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080";

/// Url of the running catalog service, taken from BOOKCATALOG_URL
pub fn service_url() -> String {
    std::env::var("BOOKCATALOG_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string())
}

/// Random 13 digit isbn, tests share one service so every book gets a fresh one
pub fn random_isbn(rng: &mut impl Rng) -> String {
    (0..13)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

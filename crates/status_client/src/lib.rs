pub mod api;
pub mod config;
pub mod demo;
pub mod session;

#[cfg(test)]
mod tests {
    use super::api::http::HttpIncidentClient;
    use super::config::ClientConfig;

    fn client_for(url: &str) -> Result<HttpIncidentClient, status_core::error::AppError> {
        HttpIncidentClient::new(&ClientConfig {
            api_url: url.to_string(),
            ..ClientConfig::default()
        })
    }

    #[test]
    fn accepts_only_plain_http_base_urls() {
        assert!(client_for("http://127.0.0.1:8000").is_ok());
        assert!(client_for("https://status.example.com").is_ok());
        assert!(client_for("https://status.example.com/api/").is_ok());

        assert!(client_for("status.example.com").is_err());
        assert!(client_for("ftp://status.example.com").is_err());
        assert!(client_for("http://").is_err());
        assert!(client_for("http://status.example.com/?x=1").is_err());
        assert!(client_for("http://status.example.com#frag").is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = client_for("https://status.example.com/").expect("client");
        assert_eq!(client.base_url(), "https://status.example.com");
    }
}

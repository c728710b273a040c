use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_EAGER, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_READ_TIMEOUT_SECONDS,
};
use clap::{Arg, ArgMatches, Command};
use tracing::error;
use uploader::{CloudinaryConfig, WebConfig};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Image host credentials and endpoints
    pub cloudinary: CloudinaryConfig,
    /// Outbound HTTP timeouts
    pub web: WebConfig,
}

impl ServerConfig {
    /// Load configuration from command-line arguments.
    /// Priority: command-line args > environment variables > defaults
    pub fn load() -> Result<Self, std::io::Error> {
        Self::from_matches(&Self::command().get_matches())
    }

    fn command() -> Command {
        Command::new("server")
            .about("User administration server with signed image uploads")
            .arg(
                Arg::new("host")
                    .long("host")
                    .value_name("HOST")
                    .help("Server host (default: 0.0.0.0, or SERVER_HOST env var)"),
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .value_name("PORT")
                    .help("Server port (default: 8080, or SERVER_PORT env var)"),
            )
            .arg(
                Arg::new("cloud-name")
                    .long("cloud-name")
                    .value_name("NAME")
                    .help("Image host cloud name (or CLOUDINARY_CLOUD_NAME env var)"),
            )
            .arg(
                Arg::new("api-key")
                    .long("api-key")
                    .value_name("KEY")
                    .help("Image host API key (or CLOUDINARY_API_KEY env var)"),
            )
            .arg(
                Arg::new("api-secret")
                    .long("api-secret")
                    .value_name("SECRET")
                    .help("Image host API secret (or CLOUDINARY_API_SECRET env var)"),
            )
            .arg(
                Arg::new("eager")
                    .long("eager")
                    .value_name("TRANSFORMATIONS")
                    .help("Eager transformations requested on upload (or CLOUDINARY_EAGER env var)"),
            )
            .arg(
                Arg::new("upload-url")
                    .long("upload-url")
                    .value_name("URL")
                    .help("Upload endpoint (default derived from cloud name, or CLOUDINARY_UPLOAD_URL env var)"),
            )
            .arg(
                Arg::new("delete-url")
                    .long("delete-url")
                    .value_name("URL")
                    .help("Delete endpoint (or CLOUDINARY_DELETE_URL env var)"),
            )
            .arg(
                Arg::new("connect-timeout")
                    .long("connect-timeout")
                    .value_name("SECONDS")
                    .help("Connect timeout towards the image host (default: 10, or WEB_CONNECT_TIMEOUT_SECONDS env var)"),
            )
            .arg(
                Arg::new("read-timeout")
                    .long("read-timeout")
                    .value_name("SECONDS")
                    .help("Read timeout towards the image host (default: 30, or WEB_READ_TIMEOUT_SECONDS env var)"),
            )
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, std::io::Error> {
        let host = lookup(matches, "host", "SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_number(
            "port",
            &lookup(matches, "port", "SERVER_PORT").unwrap_or_else(|| DEFAULT_PORT.to_string()),
        )?;

        let cloud_name = lookup(matches, "cloud-name", "CLOUDINARY_CLOUD_NAME").unwrap_or_default();
        let upload_url = lookup(matches, "upload-url", "CLOUDINARY_UPLOAD_URL").unwrap_or_else(|| {
            CloudinaryConfig::default_upload_url(&cloud_name)
        });
        let cloudinary = CloudinaryConfig {
            api_key: lookup(matches, "api-key", "CLOUDINARY_API_KEY").unwrap_or_default(),
            secret: lookup(matches, "api-secret", "CLOUDINARY_API_SECRET").unwrap_or_default(),
            eager: lookup(matches, "eager", "CLOUDINARY_EAGER")
                .unwrap_or_else(|| DEFAULT_EAGER.to_string()),
            delete_url: lookup(matches, "delete-url", "CLOUDINARY_DELETE_URL"),
            cloud_name,
            upload_url,
        };
        cloudinary.validate().map_err(|e| {
            error!("Invalid image host configuration: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
        })?;

        let web = WebConfig {
            connect_timeout_seconds: parse_number(
                "connect timeout",
                &lookup(matches, "connect-timeout", "WEB_CONNECT_TIMEOUT_SECONDS")
                    .unwrap_or_else(|| DEFAULT_CONNECT_TIMEOUT_SECONDS.to_string()),
            )?,
            read_timeout_seconds: parse_number(
                "read timeout",
                &lookup(matches, "read-timeout", "WEB_READ_TIMEOUT_SECONDS")
                    .unwrap_or_else(|| DEFAULT_READ_TIMEOUT_SECONDS.to_string()),
            )?,
        };

        Ok(ServerConfig {
            host,
            port,
            cloudinary,
            web,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn lookup(matches: &ArgMatches, arg: &str, env_var: &str) -> Option<String> {
    matches
        .get_one::<String>(arg)
        .cloned()
        .or_else(|| std::env::var(env_var).ok())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, std::io::Error> {
    value.trim().parse().map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid {}: {}", name, value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(args: &[&str]) -> Result<ServerConfig, std::io::Error> {
        let matches = ServerConfig::command()
            .try_get_matches_from(std::iter::once("server").chain(args.iter().copied()))
            .unwrap();
        ServerConfig::from_matches(&matches)
    }

    #[test]
    fn test_arguments_and_defaults() {
        let config = load(&[
            "--cloud-name",
            "demo",
            "--api-key",
            "key",
            "--api-secret",
            "secret",
            "--port",
            "9090",
            "--connect-timeout",
            "3",
        ])
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(
            config.cloudinary.upload_url,
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(config.web.connect_timeout_seconds, 3);
        assert!(config.bind_address().ends_with(":9090"));
    }

    #[test]
    fn test_explicit_upload_url() {
        let config = load(&[
            "--api-key",
            "key",
            "--api-secret",
            "secret",
            "--upload-url",
            "http://127.0.0.1:9000/upload",
            "--eager",
            "w_100",
        ])
        .unwrap();

        assert_eq!(config.cloudinary.upload_url, "http://127.0.0.1:9000/upload");
        assert_eq!(config.cloudinary.eager, "w_100");
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[
            "--cloud-name",
            "demo",
            "--api-key",
            "key",
            "--api-secret",
            "secret",
            "--read-timeout",
            "soon",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("read timeout"));
    }

    #[test]
    fn test_default_upload_url_needs_cloud_name() {
        if std::env::var_os("CLOUDINARY_CLOUD_NAME").is_some()
            || std::env::var_os("CLOUDINARY_UPLOAD_URL").is_some()
        {
            return;
        }
        let err = load(&["--api-key", "key", "--api-secret", "secret"]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("cloud name"));
    }
}

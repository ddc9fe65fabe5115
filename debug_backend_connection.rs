//! Backend connection diagnostic.
//!
//! Resolves the DataWizard configuration the same way the app does and
//! calls the duplicate-check procedure, which needs no credentials.
//!
//! Usage: `debug_backend_connection [username] [email]`

use datawizard::services::DatabaseService;
use datawizard::shared::config::default_config_path;
use datawizard::shared::{AppConfig, ErrorCategory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let mut args = std::env::args().skip(1);
    let username = args.next().unwrap_or_else(|| "datawizard_diagnostic".to_string());
    let email = args.next().unwrap_or_else(|| format!("{}@gmail.com", username));

    println!("🔍 DEBUGGING BACKEND CONNECTION");
    println!("================================");
    match default_config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        _ => println!("Config file: none, using DATAWIZARD_* environment"),
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ Configuration error: {}", e);
            println!("💡 Set DATAWIZARD_API_KEY (and DATAWIZARD_BACKEND_URL) or create the config file");
            std::process::exit(1);
        }
    };

    println!("Backend URL: {}", config.backend_url);
    println!("API key: {}", mask(&config.api_key));
    println!("bcrypt cost: {}", config.bcrypt_cost);

    let db = DatabaseService::new(config)?;

    println!("\n🧪 Checking whether '{}' / '{}' is registered...", username, email);
    match db.check_user_exists(&username, &email).await {
        Ok(true) => println!("✅ Backend reachable - user already exists"),
        Ok(false) => println!("✅ Backend reachable - user not registered"),
        Err(e) => {
            println!("❌ {}: {}", e.title(), e);
            if e.category() == ErrorCategory::Transport {
                println!("💡 Possible issues:");
                println!("   - Wrong DATAWIZARD_BACKEND_URL");
                println!("   - Backend not running or unreachable");
                println!("   - Network/firewall issues");
            } else {
                println!("💡 Check the API key and that fn_check_user_exists is deployed");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    format!("{}… ({} chars)", visible, key.chars().count())
}

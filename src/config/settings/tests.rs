use super::*;
use tempfile::TempDir;

#[test]
fn default_config() {
    let config = Config::load(TempDir::new().expect("should create TempDir").path())
        .expect("should load config successfully");
    assert_eq!(config.ollama.host, "localhost");
    assert_eq!(config.ollama.port, 11434);
    assert_eq!(config.ollama.embedding_model, "nomic-embed-text:latest");
    assert_eq!(config.ollama.generation_model, "phi3:mini");
    assert!((config.ollama.temperature - 0.6).abs() < f32::EPSILON);
    assert_eq!(config.retrieval.top_k, 4);
    assert_eq!(config.server.port, 8855);
}

#[test]
fn config_validation() {
    let mut config = Config::load(TempDir::new().expect("should create TempDir").path())
        .expect("should load config successfully");
    assert!(config.validate().is_ok());

    let mut invalid_config = config.clone();
    invalid_config.ollama.port = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.embedding_model = String::new();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.generation_model = "   ".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.temperature = 2.5;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.batch_size = 1001;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.embedding_dimension = 32;
    assert!(invalid_config.validate().is_err());

    config.retrieval.top_k = 0;
    assert!(config.validate().is_err());
}

#[test]
fn ollama_url_generation() {
    let config = Config::load(TempDir::new().expect("should create TempDir").path())
        .expect("should load config successfully");
    let url = config
        .ollama_url()
        .expect("should generate ollama_url successfully");
    assert_eq!(url.as_str(), "http://localhost:11434/");
}

#[test]
fn toml_round_trip() {
    let temp_dir = TempDir::new().expect("should create TempDir");
    let config = Config::load(temp_dir.path()).expect("should load config successfully");
    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    let mut parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    parsed_config.base_dir = temp_dir.path().to_path_buf();
    assert_eq!(config, parsed_config);
}

#[test]
fn save_and_reload() {
    let temp_dir = TempDir::new().expect("should create TempDir");
    let mut config = Config::load(temp_dir.path()).expect("should load config successfully");
    config.ollama.host = "embedder.local".to_string();
    config.retrieval.top_k = 8;
    config.save().expect("should save config successfully");

    let reloaded = Config::load(temp_dir.path()).expect("should reload config successfully");
    assert_eq!(reloaded.ollama.host, "embedder.local");
    assert_eq!(reloaded.retrieval.top_k, 8);
}

#[test]
fn setter_validation() {
    let mut config = OllamaConfig::default();

    assert!(config.set_host("example.com".to_string()).is_ok());
    assert!(config.set_port(8080).is_ok());
    assert!(config.set_embedding_model("new-model".to_string()).is_ok());
    assert!(config.set_generation_model("llama3:8b".to_string()).is_ok());
    assert!(config.set_temperature(0.9).is_ok());
    assert!(config.set_batch_size(128).is_ok());

    assert!(config.set_port(0).is_err());
    assert!(config.set_embedding_model(String::new()).is_err());
    assert!(config.set_generation_model(String::new()).is_err());
    assert!(config.set_temperature(-0.1).is_err());
    assert!(config.set_batch_size(0).is_err());
    assert!(config.set_batch_size(1001).is_err());
}

#[test]
fn derived_paths() {
    let temp_dir = TempDir::new().expect("should create TempDir");
    let config = Config::load(temp_dir.path()).expect("should load config successfully");
    assert_eq!(config.index_dir(), temp_dir.path().join("index"));
    assert_eq!(
        config.fingerprint_path(),
        temp_dir.path().join("index.fingerprint")
    );
    assert_eq!(config.config_file_path(), temp_dir.path().join("config.toml"));
}

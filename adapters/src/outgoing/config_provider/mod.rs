pub mod shared_config_provider;

pub mod tera_template_loader;

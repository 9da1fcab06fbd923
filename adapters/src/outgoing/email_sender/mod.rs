pub mod console_mail_sender;
pub mod smtp_mail_sender;

pub mod templated_message_client;

pub mod quote_client;

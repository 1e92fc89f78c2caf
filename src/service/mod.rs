pub mod quote_form;
pub mod quote_service;
pub mod ticket_counter;

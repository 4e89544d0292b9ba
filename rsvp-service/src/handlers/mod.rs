pub mod health_handlers;
pub mod rsvp_handlers;

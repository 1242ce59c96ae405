pub mod booking;
pub mod feedback;
pub mod routes;
pub mod session;

pub mod access_control;
pub mod approval;
pub mod document_service;
pub mod session;

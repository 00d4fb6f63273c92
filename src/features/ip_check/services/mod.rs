mod ip_check_service;

pub use ip_check_service::IpCheckService;

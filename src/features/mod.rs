pub mod blood_requests;
pub mod geofence;
pub mod ip_check;
pub mod submissions;

mod request_status_gate;

pub use request_status_gate::RequestStatusGate;

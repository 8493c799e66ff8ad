//! Generated bindings for `resources/wf-info-base.xml`.

pub mod wf_info {
    use smithay::reexports::wayland_server;

    pub mod __interfaces {
        use smithay::reexports::wayland_server::backend as wayland_backend;
        wayland_scanner::generate_interfaces!("resources/wf-info-base.xml");
    }

    use self::__interfaces::*;

    wayland_scanner::generate_server_code!("resources/wf-info-base.xml");
}

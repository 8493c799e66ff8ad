//! Client side of `resources/wf-info-base.xml`.

use wayland_client;

pub mod __interfaces {
    use wayland_client::backend as wayland_backend;
    wayland_scanner::generate_interfaces!("resources/wf-info-base.xml");
}

use self::__interfaces::*;

wayland_scanner::generate_client_code!("resources/wf-info-base.xml");

//! Network reachability gate.
//!
//! # Design
//! The default check asks the kernel whether a route to the outside exists
//! without sending anything: connecting a UDP socket only performs the route
//! lookup. Any failure to create or connect the lookup socket counts as
//! unreachable. `Reachability` is a trait so callers and tests can supply
//! their own gate.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

/// Decides whether a request may be attempted at all.
pub trait Reachability: Send + Sync {
    fn is_reachable(&self) -> bool;
}

impl<F> Reachability for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_reachable(&self) -> bool {
        self()
    }
}

/// Route lookup for a default IPv4 route.
#[derive(Debug, Clone, Copy)]
pub struct DefaultRoute {
    target: SocketAddrV4,
}

impl Default for DefaultRoute {
    fn default() -> Self {
        // TEST-NET-1: never local, so only a default route can reach it.
        Self {
            target: SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 1), 9),
        }
    }
}

impl DefaultRoute {
    /// Look up the route towards `target` instead of the default test address.
    pub fn towards(target: SocketAddrV4) -> Self {
        Self { target }
    }
}

impl Reachability for DefaultRoute {
    fn is_reachable(&self) -> bool {
        let socket = match UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))) {
            Ok(socket) => socket,
            Err(e) => {
                tracing::warn!(error = %e, "could not create reachability socket");
                return false;
            }
        };
        match socket.connect(self.target) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(destination = %self.target, error = %e, "no route for reachability check");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_gates() {
        let up = || true;
        let down = || false;
        assert!(up.is_reachable());
        assert!(!down.is_reachable());
    }

    #[test]
    fn loopback_route_always_exists() {
        let route = DefaultRoute::towards(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9));
        assert!(route.is_reachable());
    }

    #[test]
    fn default_route_answer_is_stable() {
        // Either answer is valid; it depends on the host's routing table.
        let route = DefaultRoute::default();
        let first = route.is_reachable();
        assert_eq!(route.is_reachable(), first);
        assert_eq!(DefaultRoute::default().is_reachable(), first);
    }

    #[test]
    fn gates_are_object_safe() {
        let gates: Vec<Box<dyn Reachability>> = vec![Box::new(|| true), Box::new(DefaultRoute::default())];
        assert!(gates[0].is_reachable());
        assert_eq!(gates[1].is_reachable(), DefaultRoute::default().is_reachable());
    }
}

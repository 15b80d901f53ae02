//! Per-platform invocations of the OS networking utilities.

use std::fmt;

use crate::process::Invocation;

/// Interface renewed on macOS when none is configured.
const MACOS_DEFAULT_INTERFACE: &str = "en0";

/// Operating system family, which decides the utilities and flags used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows (`ipconfig`, `route`, `ping -n`)
    Windows,
    /// macOS (`ifconfig`, `netstat`, `ipconfig set`)
    MacOs,
    /// Linux and other unix-likes (`ip`, `dhclient`)
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Echo `count` requests to `host`.
    pub fn ping(&self, host: &str, count: u32) -> Invocation {
        let count_flag = match self {
            Platform::Windows => "-n",
            Platform::MacOs | Platform::Linux => "-c",
        };
        Invocation::new("ping")
            .arg(count_flag)
            .arg(count.to_string())
            .arg(host)
    }

    /// Dump interface configuration.
    pub fn ip_config(&self) -> Invocation {
        match self {
            Platform::Windows => Invocation::new("ipconfig"),
            Platform::MacOs => Invocation::new("ifconfig"),
            Platform::Linux => Invocation::new("ip").args(["addr", "show"]),
        }
    }

    /// Resolve `host` with the system resolver's lookup tool.
    pub fn dns_lookup(&self, host: &str) -> Invocation {
        Invocation::new("nslookup").arg(host)
    }

    /// Dump the routing table.
    pub fn routes(&self) -> Invocation {
        match self {
            Platform::Windows => Invocation::new("route").arg("print"),
            Platform::MacOs => Invocation::new("netstat").arg("-rn"),
            Platform::Linux => Invocation::new("ip").args(["route", "show"]),
        }
    }

    /// Release the address lease.
    pub fn lease_release(&self, interface: Option<&str>) -> Invocation {
        match self {
            Platform::Windows => with_optional(Invocation::new("ipconfig").arg("/release"), interface),
            Platform::MacOs => Invocation::new("ipconfig")
                .arg("set")
                .arg(interface.unwrap_or(MACOS_DEFAULT_INTERFACE))
                .arg("BOOTP"),
            Platform::Linux => with_optional(Invocation::new("dhclient").arg("-r"), interface),
        }
    }

    /// Request a fresh address lease.
    pub fn lease_renew(&self, interface: Option<&str>) -> Invocation {
        match self {
            Platform::Windows => with_optional(Invocation::new("ipconfig").arg("/renew"), interface),
            Platform::MacOs => Invocation::new("ipconfig")
                .arg("set")
                .arg(interface.unwrap_or(MACOS_DEFAULT_INTERFACE))
                .arg("DHCP"),
            Platform::Linux => with_optional(Invocation::new("dhclient"), interface),
        }
    }

    /// Every external program the diagnostics may launch, deduplicated.
    pub fn required_programs(&self) -> Vec<String> {
        let mut programs: Vec<String> = Vec::new();
        for invocation in [
            self.ping("localhost", 1),
            self.ip_config(),
            self.dns_lookup("localhost"),
            self.routes(),
            self.lease_release(None),
            self.lease_renew(None),
        ] {
            if !programs.contains(&invocation.program) {
                programs.push(invocation.program);
            }
        }
        programs
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::MacOs => f.write_str("macos"),
            Platform::Linux => f.write_str("linux"),
        }
    }
}

fn with_optional(invocation: Invocation, arg: Option<&str>) -> Invocation {
    match arg {
        Some(arg) => invocation.arg(arg),
        None => invocation,
    }
}

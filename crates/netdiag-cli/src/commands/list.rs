//! Command listing.

use netdiag_core::Command;

/// Print every command with a short description.
pub fn run() {
    print!("{}", render());
}

fn render() -> String {
    let width = Command::ALL
        .iter()
        .map(|c| c.phrase().len())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Commands (case-insensitive):\n\n");
    for command in Command::ALL {
        let marker = match command {
            Command::Diagnostic(kind) if kind.is_destructive() => " (asks for approval)",
            _ => "",
        };
        out.push_str(&format!(
            "  {:<width$}  {}{}\n",
            command.phrase(),
            command.description(),
            marker,
            width = width
        ));
    }
    out
}

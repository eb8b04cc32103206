/// Checks the shape of an address: a non-empty local part, exactly one `@`,
/// and a domain containing a `.` with at least one character on each side.
/// Whitespace anywhere fails the check, the byte-order mark included; the
/// input is never trimmed here.
///
/// # Examples
/// ```
/// use email_verifier::handlers::validation::syntax::is_syntactically_valid;
///
/// assert!(is_syntactically_valid("user.name+tag@example.com"));
/// assert!(!is_syntactically_valid("user@@example.com"));
/// assert!(!is_syntactically_valid(" user@example.com"));
/// ```
pub fn is_syntactically_valid(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    if address.chars().any(is_blank) || domain.contains('@') {
        return false;
    }

    has_inner_dot(domain)
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// True when some `.` has at least one character before and after it.
fn has_inner_dot(domain: &str) -> bool {
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

//! Server-rendered HTML for the form-driven pages.

use std::fmt::Write as _;

use products_hr::Employee;

use crate::http::EmployeeForm;

pub const CREATE_FAILED: &str =
    "Unable to add Employee, please check that all fields are filled in.";

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>
<a href="/show-employees">All employees</a> |
<a href="/create-employee">Add employee</a>
</nav>
<section class="search">
<form method="post" action="/search-employees">
<input type="text" name="searchInput" placeholder="First name, last name or both">
<button type="submit">Search</button>
</form>
<form method="post" action="/search-by-name">
<input type="text" name="firstName" placeholder="First name">
<button type="submit">By first name</button>
</form>
<form method="post" action="/search-by-last-name">
<input type="text" name="lastName" placeholder="Last name">
<button type="submit">By last name</button>
</form>
<form method="post" action="/search-by-full-name">
<input type="text" name="fullName" placeholder="First Last">
<button type="submit">By full name</button>
</form>
<form method="post" action="/search-by-address">
<input type="text" name="address" placeholder="Address">
<button type="submit">By address</button>
</form>
</section>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn text_input(label: &str, name: &str, kind: &str, value: Option<&str>) -> String {
    format!(
        r#"<label>{label} <input type="{kind}" name="{name}" value="{value}"></label><br>"#,
        value = escape(value.unwrap_or_default()),
    )
}

pub fn create_employee(prefill: &EmployeeForm, error: Option<&str>) -> String {
    let mut body = String::from("<h1>Add employee</h1>\n");
    if let Some(message) = error {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(message));
    }
    body.push_str(r#"<form method="post" action="/submit-new-employee">"#);
    body.push('\n');
    body.push_str(&text_input("First name", "firstName", "text", prefill.first_name.as_deref()));
    body.push_str(&text_input("Last name", "lastName", "text", prefill.last_name.as_deref()));
    body.push_str(&text_input("Hire date", "hireDate", "date", prefill.hire_date.as_deref()));
    body.push_str(&text_input("Address", "address", "text", prefill.address.as_deref()));
    body.push_str("\n<button type=\"submit\">Save</button>\n</form>");
    layout("Add employee", &body)
}

pub fn show_employees(rows: &[Employee]) -> String {
    let mut body = String::from(
        "<h1>Employees</h1>\n<table>\n<thead><tr><th>Id</th><th>First name</th>\
         <th>Last name</th><th>Hire date</th><th>Address</th></tr></thead>\n<tbody>\n",
    );
    for employee in rows {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            employee.id,
            escape(&employee.first_name),
            escape(&employee.last_name),
            employee.hire_date,
            escape(&employee.address),
        );
    }
    body.push_str("</tbody>\n</table>");
    layout("Employees", &body)
}

pub fn no_results() -> String {
    layout(
        "No employees found",
        "<h1>No employees found</h1>\n<p>No employee matched your search.</p>",
    )
}

pub fn error(message: &str) -> String {
    layout(
        "Error",
        &format!("<h1>Something went wrong</h1>\n<p>{}</p>", escape(message)),
    )
}

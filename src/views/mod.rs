//! Minimal server-rendered HTML. Render functions receive plain data and
//! return complete pages; no template engine, no logic beyond iteration.

use crate::api::middleware::auth::CurrentUser;
use crate::entities::users;
use crate::services::document_service::DocumentListing;
use axum::response::Html;
use std::fmt::Write;

/// Escape text for interpolation into HTML bodies and attributes.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notice: Option<&str>, body: &str) -> Html<String> {
    let notice_html = notice
        .filter(|m| !m.is_empty())
        .map(|m| format!("<p class=\"notice\">{}</p>", escape(m)))
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} - DocSafe</title></head>\n\
         <body>\n<h1>{title}</h1>\n{notice_html}\n{body}\n</body>\n</html>\n",
        title = escape(title),
    ))
}

pub fn landing_page() -> Html<String> {
    layout(
        "DocSafe",
        None,
        "<p>Secure document management.</p>\n\
         <p><a href=\"/login\">Admin login</a> | <a href=\"/login/user\">User login</a> | \
         <a href=\"/register\">Register</a></p>",
    )
}

pub fn register_page(notice: Option<&str>) -> Html<String> {
    layout(
        "Register",
        notice,
        "<form method=\"post\" action=\"/register\">\n\
         <label>Username <input name=\"username\"></label><br>\n\
         <label>Email <input name=\"email\" type=\"email\"></label><br>\n\
         <label>Password <input name=\"password\" type=\"password\"></label><br>\n\
         <button type=\"submit\">Register</button>\n</form>\n\
         <p><a href=\"/login/user\">Already have an account? Log in</a></p>",
    )
}

fn login_form(action: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Email <input name=\"email\" type=\"email\"></label><br>\n\
         <label>Password <input name=\"password\" type=\"password\"></label><br>\n\
         <button type=\"submit\">Log in</button>\n</form>"
    )
}

pub fn login_page(notice: Option<&str>) -> Html<String> {
    let body = format!(
        "{}\n<p><a href=\"/login/user\">User login</a> | <a href=\"/register\">Register</a></p>",
        login_form("/login")
    );
    layout("Admin Login", notice, &body)
}

pub fn user_login_page(notice: Option<&str>) -> Html<String> {
    let body = format!(
        "{}\n<p><a href=\"/login\">Admin login</a> | <a href=\"/register\">Register</a></p>",
        login_form("/login/user")
    );
    layout("Login", notice, &body)
}

fn document_table(docs: &[DocumentListing], admin_actions: bool) -> String {
    if docs.is_empty() {
        return "<p>No documents.</p>".to_string();
    }

    let mut table = String::from(
        "<table border=\"1\">\n<tr><th>File</th><th>Owner</th><th>Uploaded</th></tr>\n",
    );
    for doc in docs {
        let _ = write!(
            table,
            "<tr><td><a href=\"/uploads/{disk}\">{name}</a></td><td>{owner}</td><td>{at}</td>",
            disk = escape(&doc.disk_name),
            name = escape(&doc.filename),
            owner = escape(&doc.owner_username),
            at = doc.uploaded_at.format("%Y-%m-%d %H:%M"),
        );
        if admin_actions {
            let _ = write!(
                table,
                "<td><form method=\"post\" action=\"/admin/delete_doc/{id}\">\
                 <button type=\"submit\">Delete</button></form></td>",
                id = doc.id,
            );
        }
        table.push_str("</tr>\n");
    }
    table.push_str("</table>");
    table
}

fn pending_users_panel(pending: &[users::Model]) -> String {
    let mut panel = String::from("<h2>Pending approvals</h2>\n");
    if pending.is_empty() {
        panel.push_str("<p>No users waiting for approval.</p>");
        return panel;
    }

    panel.push_str("<table border=\"1\">\n<tr><th>Username</th><th>Email</th><th>Registered</th><th></th></tr>\n");
    for user in pending {
        let _ = write!(
            panel,
            "<tr><td>{username}</td><td>{email}</td><td>{at}</td>\
             <td><form method=\"post\" action=\"/admin/approve/{id}\" style=\"display:inline\">\
             <button type=\"submit\">Approve</button></form> \
             <form method=\"post\" action=\"/admin/reject/{id}\" style=\"display:inline\">\
             <button type=\"submit\">Reject</button></form></td></tr>\n",
            username = escape(&user.username),
            email = escape(&user.email),
            at = user.created_at.format("%Y-%m-%d %H:%M"),
            id = user.id,
        );
    }
    panel.push_str("</table>");
    panel
}

pub fn dashboard_page(
    user: &CurrentUser,
    docs: &[DocumentListing],
    pending: Option<&[users::Model]>,
    notice: Option<&str>,
) -> Html<String> {
    let mut body = format!(
        "<p>Signed in as {} <a href=\"/logout\">Log out</a></p>\n",
        escape(&user.username)
    );

    if user.role.is_admin() {
        body.push_str(
            "<p><a href=\"/admin\">Admin panel</a></p>\n\
             <form method=\"post\" action=\"/dashboard\" enctype=\"multipart/form-data\">\n\
             <input type=\"file\" name=\"file\">\n\
             <button type=\"submit\">Upload</button>\n</form>\n\
             <form method=\"post\" action=\"/admin/toggle_approval\">\
             <button type=\"submit\">Toggle approval mode</button></form>\n",
        );
    }

    body.push_str("<h2>Documents</h2>\n");
    body.push_str(&document_table(docs, false));

    if let Some(pending) = pending {
        body.push('\n');
        body.push_str(&pending_users_panel(pending));
    }

    layout("Dashboard", notice, &body)
}

pub fn admin_page(
    users: &[users::Model],
    docs: &[DocumentListing],
    notice: Option<&str>,
) -> Html<String> {
    let mut body = String::from("<p><a href=\"/dashboard\">Dashboard</a></p>\n<h2>Users</h2>\n");

    if users.is_empty() {
        body.push_str("<p>No users.</p>");
    } else {
        body.push_str(
            "<table border=\"1\">\n<tr><th>Username</th><th>Email</th><th>Role</th>\
             <th>Approved</th><th>Registered</th><th></th></tr>\n",
        );
        for user in users {
            let _ = write!(
                body,
                "<tr><td>{username}</td><td>{email}</td><td>{role:?}</td><td>{approved}</td><td>{at}</td>\
                 <td><form method=\"post\" action=\"/admin/approve/{id}\" style=\"display:inline\">\
                 <button type=\"submit\">Approve</button></form> \
                 <form method=\"post\" action=\"/admin/reject/{id}\" style=\"display:inline\">\
                 <button type=\"submit\">Reject</button></form></td></tr>\n",
                username = escape(&user.username),
                email = escape(&user.email),
                role = user.role,
                approved = if user.is_approved { "yes" } else { "no" },
                at = user.created_at.format("%Y-%m-%d %H:%M"),
                id = user.id,
            );
        }
        body.push_str("</table>\n");
    }

    body.push_str("<h2>Documents</h2>\n");
    body.push_str(&document_table(docs, true));

    layout("Admin Panel", notice, &body)
}

//! Minimal server-rendered pages.
//!
//! The markup is deliberately plain; anything beyond the two pages this
//! service serves would live in a real templating layer.

/// Field-level validation errors for the login form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoginFieldErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginFieldErrors {
    pub fn any(&self) -> bool {
        self.email.is_some() || self.password.is_some()
    }
}

/// Render the login form.
///
/// `error` is the generic authentication failure banner, `notice` a flash
/// confirmation, `email_value` the previously entered email redisplayed on a
/// validation failure, and `next` the preserved destination carried through
/// the form action.
pub fn login_page(
    error: Option<&str>,
    notice: Option<&str>,
    field_errors: LoginFieldErrors,
    email_value: &str,
    next: Option<&str>,
) -> String {
    let action = match next {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_string(),
    };

    let mut messages = String::new();
    if let Some(notice) = notice {
        messages.push_str(&format!(
            r#"<p class="notice">{}</p>"#,
            escape_html(notice)
        ));
    }
    if let Some(error) = error {
        messages.push_str(&format!(r#"<p class="error">{}</p>"#, escape_html(error)));
    }

    let email_error = field_errors
        .email
        .map(|e| format!(r#"<span class="field-error">{}</span>"#, e))
        .unwrap_or_default();
    let password_error = field_errors
        .password
        .map(|e| format!(r#"<span class="field-error">{}</span>"#, e))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Log In</title></head>
<body>
<h1>Log In</h1>
{messages}
<form method="post" action="{action}">
  <label>Email
    <input type="email" name="email" value="{email}">
  </label>
  {email_error}
  <label>Password
    <input type="password" name="password">
  </label>
  {password_error}
  <button type="submit">Log In</button>
</form>
</body>
</html>
"#,
        messages = messages,
        action = escape_html(&action),
        email = escape_html(email_value),
        email_error = email_error,
        password_error = password_error,
    )
}

/// Render the protected kitchen page.
pub fn kitchen_page(email: &str, notice: Option<&str>) -> String {
    let notice = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Kitchen</title></head>
<body>
{notice}
<h1>Kitchen</h1>
<p>Signed in as {email}.</p>
<p><a href="/logout">Log out</a></p>
</body>
</html>
"#,
        notice = notice,
        email = escape_html(email),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

//! HTML consent page for OAuth authorization.

/// Render the authorization consent page.
///
/// All parameters are HTML-escaped to prevent XSS.
pub fn render_consent_page(client_id: &str, redirect_uri: &str, state: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Authorize - NetQoS MCP</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; margin: 0; display: flex; justify-content: center; align-items: center; min-height: 100vh; }}
.card {{ background: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); padding: 32px; max-width: 420px; width: 100%; }}
h1 {{ font-size: 20px; margin: 0 0 8px; color: #333; }}
.subtitle {{ color: #666; font-size: 14px; margin: 0 0 16px; }}
ul {{ text-align: left; color: #444; font-size: 14px; }}
button {{ width: 48%; padding: 10px; border: none; border-radius: 4px; font-size: 14px; font-weight: 500; cursor: pointer; margin-top: 16px; }}
.allow {{ background: #4a90d9; color: #fff; }}
.allow:hover {{ background: #357abd; }}
.deny {{ background: #e4e4e4; color: #333; margin-left: 4%; }}
.deny:hover {{ background: #d0d0d0; }}
</style>
</head>
<body>
<div class="card">
<h1>NetQoS MCP Gateway</h1>
<p class="subtitle"><strong>{client_id}</strong> is requesting read-only access to your NetQoS data</p>
<ul>
<li>Read locations</li>
<li>Read KPI measurements</li>
<li>Read operator scores</li>
<li>Read coverage statistics</li>
</ul>
<form method="POST" action="/authorize">
<input type="hidden" name="client_id" value="{client_id}">
<input type="hidden" name="redirect_uri" value="{redirect_uri}">
<input type="hidden" name="state" value="{state}">
<button type="submit" name="action" value="allow" class="allow">Approve</button>
<button type="submit" name="action" value="deny" class="deny">Deny</button>
</form>
</div>
</body>
</html>"#,
        client_id = html_escape(client_id),
        redirect_uri = html_escape(redirect_uri),
        state = html_escape(state),
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

use std::fmt::Write;

use http::StatusCode;

use crate::layout::escape_html;

use super::PageContext;

struct User {
    id: u32,
    name: &'static str,
    email: &'static str,
    active: bool,
}

// Persistence is not part of this service; the user pages render a fixture.
static USERS: [User; 4] = [
    User {
        id: 1,
        name: "Ada Lovelace",
        email: "ada@example.com",
        active: true,
    },
    User {
        id: 2,
        name: "Grace Hopper",
        email: "grace@example.com",
        active: true,
    },
    User {
        id: 7,
        name: "Alan Turing",
        email: "alan@example.com",
        active: false,
    },
    User {
        id: 42,
        name: "Douglas Adams",
        email: "douglas@example.com",
        active: true,
    },
];

fn find_user(id: u32) -> Option<&'static User> {
    USERS.iter().find(|user| user.id == id)
}

fn parse_id(context: &PageContext) -> Option<u32> {
    context
        .param("id")
        .and_then(|id| id.parse::<u32>().ok())
        .filter(|id| *id > 0)
}

fn status_label(user: &User) -> &'static str {
    if user.active {
        "active"
    } else {
        "disabled"
    }
}

pub(super) fn render_index(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_layout("main");
    context
        .metadata_mut()
        .set_title("Users - FastCGI Pages")
        .add_css("/static/css/users/index.css")
        .add_js("/static/js/users/index.js");

    writeln!(context, "<div class=\"users-index\">")?;
    writeln!(context, "    <h1>Users</h1>")?;
    writeln!(context, "    <a href=\"/users/form\" class=\"btn\">Add user</a>")?;
    writeln!(context, "    <table>")?;
    writeln!(context, "        <tr><th>ID</th><th>Name</th><th>Email</th><th>Status</th></tr>")?;
    for user in USERS.iter() {
        writeln!(
            context,
            "        <tr><td><a href=\"/users/detail/{id}\">{id}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(user.name),
            escape_html(user.email),
            status_label(user),
            id = user.id,
        )?;
    }
    writeln!(context, "    </table>")?;
    writeln!(context, "</div>")?;

    Ok(())
}

pub(super) fn render_detail(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_layout("green_layout");
    context
        .metadata_mut()
        .set_title("User detail - FastCGI Pages")
        .set_description("User details")
        .set_keywords("user detail, user information")
        .add_css("/static/css/users/detail.css")
        .add_js("/static/js/users/detail.js");

    let user = match parse_id(context) {
        None => {
            context.set_status(StatusCode::BAD_REQUEST);
            writeln!(context, "<p class=\"alert alert-error\">Invalid user id.</p>")?;
            writeln!(context, "<a href=\"/users\">Back to the list</a>")?;
            return Ok(());
        }
        Some(id) => match find_user(id) {
            None => {
                context.set_status(StatusCode::NOT_FOUND);
                writeln!(context, "<p class=\"alert alert-error\">User {} not found.</p>", id)?;
                writeln!(context, "<a href=\"/users\">Back to the list</a>")?;
                return Ok(());
            }
            Some(user) => user,
        },
    };

    context.metadata_mut().set_data("user_id", user.id);

    writeln!(context, "<div class=\"users-detail\">")?;
    writeln!(context, "    <h1>User #{}</h1>", user.id)?;
    writeln!(context, "    <dl>")?;
    writeln!(context, "        <dt>Name</dt><dd>{}</dd>", escape_html(user.name))?;
    writeln!(context, "        <dt>Email</dt><dd>{}</dd>", escape_html(user.email))?;
    writeln!(context, "        <dt>Status</dt><dd>{}</dd>", status_label(user))?;
    writeln!(context, "    </dl>")?;
    writeln!(context, "    <a href=\"/users\" class=\"btn\">Back to the list</a>")?;
    writeln!(
        context,
        "    <a href=\"/users/form/{}\" class=\"btn\">Edit user</a>",
        user.id
    )?;
    writeln!(context, "</div>")?;

    Ok(())
}

pub(super) fn render_form(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_layout("main");
    context
        .metadata_mut()
        .add_js("/static/js/users/form.js");

    let user = parse_id(context).and_then(find_user);

    let (heading, name, email) = match user {
        Some(user) => (format!("Edit user #{}", user.id), user.name, user.email),
        None => ("Add user".to_owned(), "", ""),
    };
    context.metadata_mut().set_title(format!("{} - FastCGI Pages", heading));

    writeln!(context, "<div class=\"users-form\">")?;
    writeln!(context, "    <h1>{}</h1>", heading)?;
    writeln!(context, "    <form method=\"post\" action=\"/users/save\">")?;
    if let Some(user) = user {
        writeln!(context, "        <input type=\"hidden\" name=\"id\" value=\"{}\">", user.id)?;
    }
    writeln!(
        context,
        "        <label>Name <input name=\"name\" value=\"{}\"></label>",
        escape_html(name)
    )?;
    writeln!(
        context,
        "        <label>Email <input name=\"email\" value=\"{}\"></label>",
        escape_html(email)
    )?;
    writeln!(context, "        <button type=\"submit\">Save</button>")?;
    writeln!(context, "    </form>")?;
    writeln!(context, "</div>")?;

    Ok(())
}

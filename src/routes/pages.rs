use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;

use crate::ai::prompts::ShopProfile;
use crate::credentials;
use crate::db::DbPool;
use crate::models::settings::Setting;
use crate::state::AppState;

#[derive(Debug, FromForm)]
pub struct SetupForm {
    pub api_key: String,
}

// ── Generator ─────────────────────────────────────────

#[get("/")]
pub fn index(pool: &State<DbPool>, state: &State<AppState>) -> Result<Template, Redirect> {
    if credentials::load(pool).is_none() {
        return Err(Redirect::to(uri!(setup_page)));
    }

    let shop = ShopProfile::from_settings(&Setting::all(pool));
    let session = state.snapshot();
    let context = json!({
        "page_title": "Product Copy Generator",
        "shop_name": shop.name,
        "shop_url": shop.url,
        "busy": session.busy,
        "has_result": session.result.is_some(),
        "error": session.error,
    });

    Ok(Template::render("index", &context))
}

// ── Credential setup ──────────────────────────────────

#[get("/setup")]
pub fn setup_page(pool: &State<DbPool>, flash: Option<FlashMessage<'_>>) -> Template {
    let mut context = json!({
        "page_title": "API Key Setup",
        "has_key": credentials::load(pool).is_some(),
    });

    if let Some(ref f) = flash {
        context["flash_kind"] = json!(f.kind());
        context["flash_msg"] = json!(f.message());
    }

    Template::render("setup", &context)
}

#[post("/setup", data = "<form>")]
pub fn setup_submit(pool: &State<DbPool>, form: Form<SetupForm>) -> Result<Redirect, Flash<Redirect>> {
    match credentials::store(pool, &form.api_key) {
        Ok(()) => Ok(Redirect::to(uri!(index))),
        Err(e) => Err(Flash::error(Redirect::to(uri!(setup_page)), e)),
    }
}

#[post("/setup/clear")]
pub fn setup_clear(pool: &State<DbPool>, state: &State<AppState>) -> Flash<Redirect> {
    state.clear();
    match credentials::clear(pool) {
        Ok(()) => Flash::success(Redirect::to(uri!(setup_page)), "API Key removed."),
        Err(e) => Flash::error(Redirect::to(uri!(setup_page)), e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, setup_page, setup_submit, setup_clear]
}

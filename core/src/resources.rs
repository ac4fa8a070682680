//! Resource-level calls: boards, cards, lists, members, organizations,
//! checklists, labels and webhooks.
//!
//! Each call is a pure `RequestSpec` constructor in this module plus a thin
//! method on `TrelloClient`. Required identifiers and names may not be
//! empty; that check happens before anything is built, so the methods return
//! `Err` at the call site the same way [`TrelloClient::request`] does and
//! only a valid call yields a future.

use std::future::Future;

use crate::client::TrelloClient;
use crate::dispatch::Outcome;
use crate::error::ApiError;
use crate::http::HttpMethod::{Delete, Get, Post, Put};
use crate::params::{Params, Scalar};
use crate::request::RequestSpec;
use crate::transport::Transport;

fn require<'a>(value: &'a str, name: &'static str) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingParameter(name));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

pub fn add_board(name: &str, description: &str, team_id: &str) -> Result<RequestSpec, ApiError> {
    let params = Params::new()
        .with("name", require(name, "name")?)
        .with("desc", require(description, "description")?)
        .with("idOrganization", require(team_id, "team_id")?);
    Ok(RequestSpec::new(Post, "/1/boards").with_params(params))
}

/// `params` holds board fields or prefs, e.g. `{"name": "new board name"}`.
pub fn update_board_pref(board_id: &str, params: Params) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    Ok(RequestSpec::new(Put, format!("/1/boards/{board_id}")).with_params(params))
}

pub fn add_list_to_board(board_id: &str, name: &str) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    let params = Params::new().with("name", require(name, "name")?);
    Ok(RequestSpec::new(Post, format!("/1/boards/{board_id}/lists")).with_params(params))
}

/// `member_rights` is one of `admin`, `normal` or `observer`.
pub fn add_member_to_board(
    board_id: &str,
    member_id: &str,
    member_rights: &str,
) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    let member_id = require(member_id, "member_id")?;
    let params = Params::new().with("type", require(member_rights, "member_rights")?);
    Ok(RequestSpec::new(Put, format!("/1/boards/{board_id}/members/{member_id}")).with_params(params))
}

pub fn get_board_members(board_id: &str) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    Ok(RequestSpec::new(Get, format!("/1/boards/{board_id}/members")))
}

pub fn get_lists_on_board(board_id: &str) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    Ok(RequestSpec::new(Get, format!("/1/boards/{board_id}/lists")))
}

pub fn get_lists_on_board_by_filter(board_id: &str, filter: &str) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    let params = Params::new().with("filter", require(filter, "filter")?);
    Ok(RequestSpec::new(Get, format!("/1/boards/{board_id}/lists")).with_params(params))
}

pub fn get_cards_on_board(board_id: &str) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    Ok(RequestSpec::new(Get, format!("/1/boards/{board_id}/cards")))
}

/// `extra` is a trailing path segment such as a card filter (`open`, `closed`).
pub fn get_cards_on_board_with_extra_params(
    board_id: &str,
    extra: &str,
) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    let extra = require(extra, "extra")?;
    Ok(RequestSpec::new(Get, format!("/1/boards/{board_id}/cards/{extra}")))
}

pub fn get_labels_for_board(board_id: &str) -> Result<RequestSpec, ApiError> {
    let board_id = require(board_id, "board_id")?;
    Ok(RequestSpec::new(Get, format!("/1/boards/{board_id}/labels")))
}

pub fn add_label_on_board(board_id: &str, name: &str, color: &str) -> Result<RequestSpec, ApiError> {
    let params = Params::new()
        .with("idBoard", require(board_id, "board_id")?)
        .with("color", require(color, "color")?)
        .with("name", name);
    Ok(RequestSpec::new(Post, "/1/labels").with_params(params))
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

pub fn add_card(name: &str, list_id: &str) -> Result<RequestSpec, ApiError> {
    let params = Params::new()
        .with("name", require(name, "name")?)
        .with("idList", require(list_id, "list_id")?);
    Ok(RequestSpec::new(Post, "/1/cards").with_params(params))
}

/// Like [`add_card`], with any extra card fields merged in (`desc`, `due`, ...).
pub fn add_card_with_extra_params(
    name: &str,
    extra_params: Params,
    list_id: &str,
) -> Result<RequestSpec, ApiError> {
    let mut params = Params::new()
        .with("name", require(name, "name")?)
        .with("idList", require(list_id, "list_id")?);
    params.extend(extra_params);
    Ok(RequestSpec::new(Post, "/1/cards").with_params(params))
}

pub fn get_card(card_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    Ok(RequestSpec::new(Get, format!("/1/cards/{card_id}")))
}

pub fn add_comment_to_card(card_id: &str, comment: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("text", require(comment, "comment")?);
    Ok(RequestSpec::new(Post, format!("/1/cards/{card_id}/actions/comments")).with_params(params))
}

pub fn add_attachment_to_card(card_id: &str, url: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("url", require(url, "url")?);
    Ok(RequestSpec::new(Post, format!("/1/cards/{card_id}/attachments")).with_params(params))
}

pub fn add_member_to_card(card_id: &str, member_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("value", require(member_id, "member_id")?);
    Ok(RequestSpec::new(Post, format!("/1/cards/{card_id}/members")).with_params(params))
}

pub fn add_checklist_to_card(card_id: &str, name: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("name", require(name, "name")?);
    Ok(RequestSpec::new(Post, format!("/1/cards/{card_id}/checklists")).with_params(params))
}

/// Copy checklist `checklist_id` onto the card.
pub fn add_existing_checklist_to_card(card_id: &str, checklist_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("idChecklistSource", require(checklist_id, "checklist_id")?);
    Ok(RequestSpec::new(Post, format!("/1/cards/{card_id}/checklists")).with_params(params))
}

pub fn get_checklists_on_card(card_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    Ok(RequestSpec::new(Get, format!("/1/cards/{card_id}/checklists")))
}

pub fn update_card(card_id: &str, params: Params) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    Ok(RequestSpec::new(Put, format!("/1/cards/{card_id}")).with_params(params))
}

pub fn update_card_name(card_id: &str, name: &str) -> Result<RequestSpec, ApiError> {
    update_card(card_id, Params::new().with("name", require(name, "name")?))
}

pub fn update_card_description(card_id: &str, description: &str) -> Result<RequestSpec, ApiError> {
    update_card(card_id, Params::new().with("desc", description))
}

/// Move the card to another list.
pub fn update_card_list(card_id: &str, list_id: &str) -> Result<RequestSpec, ApiError> {
    update_card(card_id, Params::new().with("idList", require(list_id, "list_id")?))
}

pub fn add_label_to_card(card_id: &str, label_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("value", require(label_id, "label_id")?);
    Ok(RequestSpec::new(Post, format!("/1/cards/{card_id}/idLabels")).with_params(params))
}

pub fn delete_label_from_card(card_id: &str, label_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let label_id = require(label_id, "label_id")?;
    Ok(RequestSpec::new(Delete, format!("/1/cards/{card_id}/idLabels/{label_id}")))
}

pub fn get_card_stickers(card_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    Ok(RequestSpec::new(Get, format!("/1/cards/{card_id}/stickers")))
}

/// `date_value` is any date string the API accepts, e.g. an ISO-8601 timestamp.
pub fn add_due_date_to_card(card_id: &str, date_value: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    let params = Params::new().with("value", require(date_value, "date_value")?);
    Ok(RequestSpec::new(Put, format!("/1/cards/{card_id}/due")).with_params(params))
}

pub fn delete_card(card_id: &str) -> Result<RequestSpec, ApiError> {
    let card_id = require(card_id, "card_id")?;
    Ok(RequestSpec::new(Delete, format!("/1/cards/{card_id}")))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

pub fn get_cards_for_list(list_id: &str) -> Result<RequestSpec, ApiError> {
    let list_id = require(list_id, "list_id")?;
    Ok(RequestSpec::new(Get, format!("/1/lists/{list_id}")))
}

pub fn rename_list(list_id: &str, name: &str) -> Result<RequestSpec, ApiError> {
    let list_id = require(list_id, "list_id")?;
    let params = Params::new().with("value", require(name, "name")?);
    Ok(RequestSpec::new(Put, format!("/1/lists/{list_id}/name")).with_params(params))
}

pub fn get_cards_on_list(list_id: &str) -> Result<RequestSpec, ApiError> {
    let list_id = require(list_id, "list_id")?;
    Ok(RequestSpec::new(Get, format!("/1/lists/{list_id}/cards")))
}

/// Fetch only `fields` of each card, sent as `fields=id,name,badges`.
pub fn get_cards_on_list_with_extra_params(
    list_id: &str,
    fields: &[&str],
) -> Result<RequestSpec, ApiError> {
    let list_id = require(list_id, "list_id")?;
    let fields = fields.iter().map(|f| Scalar::from(*f)).collect();
    Ok(RequestSpec::new(Get, format!("/1/lists/{list_id}/cards")).with_list("fields", fields))
}

// ---------------------------------------------------------------------------
// Members and organizations
// ---------------------------------------------------------------------------

pub fn get_boards(member_id: &str) -> Result<RequestSpec, ApiError> {
    let member_id = require(member_id, "member_id")?;
    Ok(RequestSpec::new(Get, format!("/1/members/{member_id}/boards")))
}

pub fn get_member(member_id: &str) -> Result<RequestSpec, ApiError> {
    let member_id = require(member_id, "member_id")?;
    Ok(RequestSpec::new(Get, format!("/1/member/{member_id}")))
}

pub fn get_member_cards(member_id: &str) -> Result<RequestSpec, ApiError> {
    let member_id = require(member_id, "member_id")?;
    Ok(RequestSpec::new(Get, format!("/1/member/{member_id}/cards")))
}

pub fn get_org_boards(organization_id: &str) -> Result<RequestSpec, ApiError> {
    let organization_id = require(organization_id, "organization_id")?;
    Ok(RequestSpec::new(Get, format!("/1/organizations/{organization_id}/boards")))
}

pub fn get_org_members(organization_id: &str) -> Result<RequestSpec, ApiError> {
    let organization_id = require(organization_id, "organization_id")?;
    Ok(RequestSpec::new(Get, format!("/1/organizations/{organization_id}/members")))
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

/// `pos` is `top`, `bottom` or a positive number.
pub fn add_item_to_checklist(
    checklist_id: &str,
    name: &str,
    pos: impl Into<Scalar>,
) -> Result<RequestSpec, ApiError> {
    let checklist_id = require(checklist_id, "checklist_id")?;
    let pos: Scalar = pos.into();
    let params = Params::new()
        .with("name", require(name, "name")?)
        .with("pos", pos);
    Ok(RequestSpec::new(Post, format!("/1/checklists/{checklist_id}/checkitems")).with_params(params))
}

pub fn update_checklist(checklist_id: &str, params: Params) -> Result<RequestSpec, ApiError> {
    let checklist_id = require(checklist_id, "checklist_id")?;
    Ok(RequestSpec::new(Put, format!("/1/checklists/{checklist_id}")).with_params(params))
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub fn update_label(label_id: &str, params: Params) -> Result<RequestSpec, ApiError> {
    let label_id = require(label_id, "label_id")?;
    Ok(RequestSpec::new(Put, format!("/1/labels/{label_id}")).with_params(params))
}

pub fn update_label_name(label_id: &str, name: &str) -> Result<RequestSpec, ApiError> {
    update_label(label_id, Params::new().with("name", name))
}

pub fn update_label_color(label_id: &str, color: &str) -> Result<RequestSpec, ApiError> {
    update_label(label_id, Params::new().with("color", require(color, "color")?))
}

pub fn delete_label(label_id: &str) -> Result<RequestSpec, ApiError> {
    let label_id = require(label_id, "label_id")?;
    Ok(RequestSpec::new(Delete, format!("/1/labels/{label_id}")))
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

/// Register `callback_url` for changes on model `id_model` (a board, card, ...).
pub fn add_webhook(description: &str, callback_url: &str, id_model: &str) -> Result<RequestSpec, ApiError> {
    let params = Params::new()
        .with("description", description)
        .with("callbackURL", require(callback_url, "callback_url")?)
        .with("idModel", require(id_model, "id_model")?);
    Ok(RequestSpec::webhooks(Post, "").with_params(params))
}

pub fn delete_webhook(webhook_id: &str) -> Result<RequestSpec, ApiError> {
    let webhook_id = require(webhook_id, "webhook_id")?;
    Ok(RequestSpec::webhooks(Delete, format!("/{webhook_id}")))
}

/// Webhooks registered under the client's token.
pub fn get_webhooks() -> RequestSpec {
    RequestSpec::webhooks(Get, "")
}

// ---------------------------------------------------------------------------
// Client methods
// ---------------------------------------------------------------------------

/// Every method validates its arguments synchronously and returns the
/// request future on success.
impl<T: Transport> TrelloClient<T> {
    pub fn add_board(
        &self,
        name: &str,
        description: &str,
        team_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_board(name, description, team_id)?))
    }

    pub fn update_board_pref(
        &self,
        board_id: &str,
        params: Params,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_board_pref(board_id, params)?))
    }

    pub fn add_list_to_board(
        &self,
        board_id: &str,
        name: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_list_to_board(board_id, name)?))
    }

    pub fn add_member_to_board(
        &self,
        board_id: &str,
        member_id: &str,
        member_rights: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_member_to_board(board_id, member_id, member_rights)?))
    }

    pub fn get_board_members(
        &self,
        board_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_board_members(board_id)?))
    }

    pub fn get_lists_on_board(
        &self,
        board_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_lists_on_board(board_id)?))
    }

    pub fn get_lists_on_board_by_filter(
        &self,
        board_id: &str,
        filter: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_lists_on_board_by_filter(board_id, filter)?))
    }

    pub fn get_cards_on_board(
        &self,
        board_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_cards_on_board(board_id)?))
    }

    pub fn get_cards_on_board_with_extra_params(
        &self,
        board_id: &str,
        extra: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_cards_on_board_with_extra_params(board_id, extra)?))
    }

    pub fn get_labels_for_board(
        &self,
        board_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_labels_for_board(board_id)?))
    }

    pub fn add_label_on_board(
        &self,
        board_id: &str,
        name: &str,
        color: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_label_on_board(board_id, name, color)?))
    }

    pub fn add_card(
        &self,
        name: &str,
        list_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_card(name, list_id)?))
    }

    pub fn add_card_with_extra_params(
        &self,
        name: &str,
        extra_params: Params,
        list_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_card_with_extra_params(name, extra_params, list_id)?))
    }

    pub fn get_card(
        &self,
        card_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_card(card_id)?))
    }

    pub fn add_comment_to_card(
        &self,
        card_id: &str,
        comment: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_comment_to_card(card_id, comment)?))
    }

    pub fn add_attachment_to_card(
        &self,
        card_id: &str,
        url: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_attachment_to_card(card_id, url)?))
    }

    pub fn add_member_to_card(
        &self,
        card_id: &str,
        member_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_member_to_card(card_id, member_id)?))
    }

    pub fn add_checklist_to_card(
        &self,
        card_id: &str,
        name: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_checklist_to_card(card_id, name)?))
    }

    pub fn add_existing_checklist_to_card(
        &self,
        card_id: &str,
        checklist_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_existing_checklist_to_card(card_id, checklist_id)?))
    }

    pub fn get_checklists_on_card(
        &self,
        card_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_checklists_on_card(card_id)?))
    }

    pub fn update_card(
        &self,
        card_id: &str,
        params: Params,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_card(card_id, params)?))
    }

    pub fn update_card_name(
        &self,
        card_id: &str,
        name: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_card_name(card_id, name)?))
    }

    pub fn update_card_description(
        &self,
        card_id: &str,
        description: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_card_description(card_id, description)?))
    }

    pub fn update_card_list(
        &self,
        card_id: &str,
        list_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_card_list(card_id, list_id)?))
    }

    pub fn add_label_to_card(
        &self,
        card_id: &str,
        label_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_label_to_card(card_id, label_id)?))
    }

    pub fn delete_label_from_card(
        &self,
        card_id: &str,
        label_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(delete_label_from_card(card_id, label_id)?))
    }

    pub fn get_card_stickers(
        &self,
        card_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_card_stickers(card_id)?))
    }

    pub fn add_due_date_to_card(
        &self,
        card_id: &str,
        date_value: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_due_date_to_card(card_id, date_value)?))
    }

    pub fn delete_card(
        &self,
        card_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(delete_card(card_id)?))
    }

    pub fn get_cards_for_list(
        &self,
        list_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_cards_for_list(list_id)?))
    }

    pub fn rename_list(
        &self,
        list_id: &str,
        name: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(rename_list(list_id, name)?))
    }

    pub fn get_cards_on_list(
        &self,
        list_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_cards_on_list(list_id)?))
    }

    pub fn get_cards_on_list_with_extra_params(
        &self,
        list_id: &str,
        fields: &[&str],
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_cards_on_list_with_extra_params(list_id, fields)?))
    }

    pub fn get_boards(
        &self,
        member_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_boards(member_id)?))
    }

    pub fn get_member(
        &self,
        member_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_member(member_id)?))
    }

    pub fn get_member_cards(
        &self,
        member_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_member_cards(member_id)?))
    }

    pub fn get_org_boards(
        &self,
        organization_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_org_boards(organization_id)?))
    }

    pub fn get_org_members(
        &self,
        organization_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_org_members(organization_id)?))
    }

    pub fn add_item_to_checklist(
        &self,
        checklist_id: &str,
        name: &str,
        pos: impl Into<Scalar>,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_item_to_checklist(checklist_id, name, pos)?))
    }

    pub fn update_checklist(
        &self,
        checklist_id: &str,
        params: Params,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_checklist(checklist_id, params)?))
    }

    pub fn update_label(
        &self,
        label_id: &str,
        params: Params,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_label(label_id, params)?))
    }

    pub fn update_label_name(
        &self,
        label_id: &str,
        name: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_label_name(label_id, name)?))
    }

    pub fn update_label_color(
        &self,
        label_id: &str,
        color: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(update_label_color(label_id, color)?))
    }

    pub fn delete_label(
        &self,
        label_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(delete_label(label_id)?))
    }

    pub fn add_webhook(
        &self,
        description: &str,
        callback_url: &str,
        id_model: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(add_webhook(description, callback_url, id_model)?))
    }

    pub fn delete_webhook(
        &self,
        webhook_id: &str,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(delete_webhook(webhook_id)?))
    }

    pub fn get_webhooks(&self) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        Ok(self.execute(get_webhooks()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::request::{build, Credentials, Route};
    use serde_json::Value;

    const BASE: &str = "https://api.trello.com";

    fn creds() -> Credentials {
        Credentials::new("k", "t")
    }

    fn body(spec: &RequestSpec) -> Value {
        let req = build(BASE, &creds(), spec);
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn add_board_builds_expected_body() {
        let spec = add_board("name", "desc", "team1").unwrap();
        let req = build(BASE, &creds(), &spec);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.trello.com/1/boards");
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"name":"name","desc":"desc","idOrganization":"team1","key":"k","token":"t"}"#)
        );
    }

    #[test]
    fn add_board_requires_every_argument() {
        assert!(matches!(add_board("", "d", "t"), Err(ApiError::MissingParameter("name"))));
        assert!(matches!(add_board("n", " ", "t"), Err(ApiError::MissingParameter("description"))));
        assert!(matches!(add_board("n", "d", ""), Err(ApiError::MissingParameter("team_id"))));
    }

    #[test]
    fn add_card_with_extra_params_merges() {
        let extra = Params::new().with("desc", "details").with("pos", "top");
        let spec = add_card_with_extra_params("Card", extra, "l1").unwrap();
        let body = body(&spec);
        assert_eq!(body["name"], "Card");
        assert_eq!(body["idList"], "l1");
        assert_eq!(body["desc"], "details");
        assert_eq!(body["pos"], "top");
    }

    #[test]
    fn add_member_to_board_sends_type() {
        let spec = add_member_to_board("b1", "m1", "observer").unwrap();
        let req = build(BASE, &creds(), &spec);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "https://api.trello.com/1/boards/b1/members/m1");
        assert_eq!(body(&spec)["type"], "observer");
    }

    #[test]
    fn lists_by_filter_uses_query() {
        let req = build(BASE, &creds(), &get_lists_on_board_by_filter("b1", "open").unwrap());
        assert_eq!(req.url, "https://api.trello.com/1/boards/b1/lists?key=k&token=t&filter=open");
    }

    #[test]
    fn cards_on_list_with_fields_joins_fields() {
        let spec = get_cards_on_list_with_extra_params("l1", &["id", "name", "badges"]).unwrap();
        let req = build(BASE, &creds(), &spec);
        assert_eq!(
            req.url,
            "https://api.trello.com/1/lists/l1/cards?key=k&token=t&fields=id,name,badges"
        );
    }

    #[test]
    fn update_helpers_target_card() {
        let req = build(BASE, &creds(), &update_card_list("c1", "l2").unwrap());
        assert_eq!(req.url, "https://api.trello.com/1/cards/c1");
        assert_eq!(body(&update_card_list("c1", "l2").unwrap())["idList"], "l2");
        assert_eq!(body(&update_card_description("c1", "d").unwrap())["desc"], "d");
    }

    #[test]
    fn due_date_is_a_put_value() {
        let spec = add_due_date_to_card("c1", "2026-01-01T00:00:00Z").unwrap();
        assert_eq!(spec.method, HttpMethod::Put);
        assert_eq!(body(&spec)["value"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn checklist_item_position_accepts_numbers() {
        let spec = add_item_to_checklist("cl1", "Item", 3i64).unwrap();
        assert_eq!(body(&spec)["pos"], 3);
        let spec = add_item_to_checklist("cl1", "Item", "bottom").unwrap();
        assert_eq!(body(&spec)["pos"], "bottom");
    }

    #[test]
    fn label_deletion_is_query_authenticated() {
        let req = build(BASE, &creds(), &delete_label_from_card("c1", "lb1").unwrap());
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://api.trello.com/1/cards/c1/idLabels/lb1?key=k&token=t");
    }

    #[test]
    fn webhooks_use_token_route() {
        let spec = add_webhook("watch", "https://example.com/hook", "b1").unwrap();
        assert_eq!(spec.route, Route::TokenWebhooks(String::new()));
        let req = build(BASE, &creds(), &spec);
        assert_eq!(req.url, "https://api.trello.com/1/tokens/t/webhooks");
        let body = body(&spec);
        assert_eq!(body["callbackURL"], "https://example.com/hook");
        assert_eq!(body["key"], "k");
        assert!(body.get("token").is_none());

        let req = build(BASE, &creds(), &delete_webhook("w1").unwrap());
        assert_eq!(req.url, "https://api.trello.com/1/tokens/t/webhooks/w1?key=k");

        let req = build(BASE, &creds(), &get_webhooks());
        assert_eq!(req.url, "https://api.trello.com/1/tokens/t/webhooks?key=k");
    }

    #[test]
    fn member_paths_follow_upstream() {
        assert_eq!(get_member("me").unwrap().route, Route::Api("/1/member/me".into()));
        assert_eq!(get_boards("me").unwrap().route, Route::Api("/1/members/me/boards".into()));
        assert_eq!(
            get_org_members("org").unwrap().route,
            Route::Api("/1/organizations/org/members".into())
        );
    }
}

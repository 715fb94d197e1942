// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::{Ack, LoginResponse, UserProfile};
use crate::store::Store;
use serde_json::json;

/// Logs in and persists the session token and profile. FX warm-up and the
/// initial bill sync are the caller's follow-up steps.
pub fn login(store: &Store, api: &ApiClient, email: &str, password: &str) -> Result<UserProfile> {
    let body = json!({ "email": email.trim(), "password": password });
    let res: LoginResponse = api.request(store, "POST", "/login.php", Some(&body))?;

    if res.success == Some(false) {
        let message = res
            .message
            .or(res.error)
            .unwrap_or_else(|| "invalid credentials".to_string());
        return Err(Error::Server(message));
    }
    let (Some(token), Some(user)) = (res.token, res.user) else {
        return Err(Error::Server("malformed server response".to_string()));
    };

    store.set_token(&token)?;
    store.save_user(&user)?;
    Ok(user)
}

pub fn register(
    store: &Store,
    api: &ApiClient,
    username: &str,
    email: &str,
    password: &str,
    currency: &str,
) -> Result<()> {
    let body = json!({
        "username": username.trim(),
        "email": email.trim(),
        "password": password,
        "currency": currency,
    });
    let _: Ack = api.request(store, "POST", "/register.php", Some(&body))?;
    Ok(())
}

/// Updates username/email on the server, then merges the change into the
/// stored profile. Anything other than an explicit `ok: false` counts as
/// accepted.
pub fn update_profile(
    store: &Store,
    api: &ApiClient,
    username: &str,
    email: &str,
) -> Result<UserProfile> {
    let Some(mut user) = store.user()? else {
        return Err(Error::AuthRequired);
    };
    let body = json!({ "userID": user.id, "username": username, "email": email });
    let res: Ack = api.request(store, "POST", "/updateProfile.php", Some(&body))?;
    if res.ok == Some(false) {
        return Err(Error::Server(
            res.error
                .unwrap_or_else(|| "update failed on server".to_string()),
        ));
    }
    user.username = Some(username.to_string());
    user.email = Some(email.to_string());
    store.save_user(&user)?;
    Ok(user)
}

pub fn update_password(
    store: &Store,
    api: &ApiClient,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let user_id = store
        .user()?
        .and_then(|u| u.id)
        .ok_or(Error::AuthRequired)?;
    let body = json!({
        "userID": user_id,
        "oldPassword": old_password,
        "newPassword": new_password,
    });
    let res: Ack = api.request(store, "POST", "/updatePassword.php", Some(&body))?;
    // Backends answer with either flag; both must be non-false.
    if res.success == Some(false) || res.ok == Some(false) {
        return Err(Error::Server(
            res.error
                .unwrap_or_else(|| "password update failed".to_string()),
        ));
    }
    Ok(())
}

/// Clears the whole local session. Storage failures are logged inside
/// `clear_all`, never raised.
pub fn logout(store: &Store) {
    store.clear_all();
}

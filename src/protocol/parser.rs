//! Request body parsing
//!
//! Form endpoints accept urlencoded bodies as well as `multipart/form-data`,
//! which is what a browser sends for a `FormData` object.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use actix_web::{Either, web};
use futures_util::TryStreamExt;

use crate::error::StorageError;

/// Longest text field accepted from a multipart body
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Form body in either encoding
pub type FormBody = Either<web::Form<HashMap<String, String>>, Multipart>;

/// Collect the text fields of a form body.
pub async fn form_fields(body: FormBody) -> Result<HashMap<String, String>, StorageError> {
    match body {
        Either::Left(form) => Ok(form.into_inner()),
        Either::Right(mut multipart) => {
            let mut fields = HashMap::new();
            while let Some(mut field) = next_field(&mut multipart).await? {
                let name = field_name(&field);
                let value = collect_text_field(&mut field).await?;
                if let Some(name) = name {
                    fields.entry(name).or_insert(value);
                }
            }
            Ok(fields)
        }
    }
}

/// Next part of a multipart body
pub async fn next_field(multipart: &mut Multipart) -> Result<Option<Field>, StorageError> {
    multipart
        .try_next()
        .await
        .map_err(|err| StorageError::Validation(format!("multipart error: {err}")))
}

/// Name of a multipart field, if it has one
pub fn field_name(field: &Field) -> Option<String> {
    field.content_disposition().get_name().map(str::to_string)
}

/// Client-supplied filename of a multipart field
pub fn field_filename(field: &Field) -> Option<String> {
    field
        .content_disposition()
        .get_filename()
        .map(str::to_string)
}

/// Read a text field; surrounding whitespace is kept.
pub async fn collect_text_field(field: &mut Field) -> Result<String, StorageError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err| StorageError::Validation(format!("failed to read field: {err}")))?
    {
        if data.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(StorageError::Validation("form field too large".into()));
        }
        data.extend_from_slice(&chunk);
    }
    String::from_utf8(data).map_err(|_| StorageError::Validation("field is not valid UTF-8".into()))
}

/// Read and discard the rest of a field.
pub async fn drain_field(field: &mut Field) -> Result<(), StorageError> {
    while field
        .try_next()
        .await
        .map_err(|err| StorageError::Validation(format!("failed to read field: {err}")))?
        .is_some()
    {}
    Ok(())
}

use crate::errors::AppError;
use actix_web::web;

/// bcrypt hash, computed on the blocking pool.
pub async fn hash(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| AppError::Password(err.to_string()))?
        .map_err(|err| AppError::Password(err.to_string()))
}

/// `false` for a wrong password and for a malformed stored hash alike.
pub async fn verify(password: String, hash: String) -> Result<bool, AppError> {
    let verified = web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| AppError::Password(err.to_string()))?;

    Ok(verified.unwrap_or_else(|err| {
        tracing::warn!("Stored password hash could not be checked: {:?}", err);
        false
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn hash_then_verify() {
        let hashed = hash("password".to_string(), 4).await.unwrap();
        assert_ne!(hashed, "password");
        assert!(verify("password".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify("wrong".to_string(), hashed).await.unwrap());
    }

    #[actix_web::test]
    async fn malformed_hash_does_not_verify() {
        assert!(!verify("password".to_string(), "not-a-hash".to_string())
            .await
            .unwrap());
    }
}

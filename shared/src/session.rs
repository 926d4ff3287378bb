//! 会话模块
//!
//! 将后端签发的 JWT 解码为用户身份与角色。
//! 客户端不校验签名（由服务端负责），只读取 payload 中的声明。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[cfg(test)]
mod tests;

// =========================================================
// 角色
// =========================================================

/// 用户角色，对应 Spring Security 的 `ROLE_*` 权限字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Hod,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Hod, Role::Teacher, Role::Student];

    /// 解析权限字符串，如 `ROLE_ADMIN`
    pub fn from_authority(authority: &str) -> Option<Self> {
        match authority {
            "ROLE_ADMIN" => Some(Role::Admin),
            "ROLE_HOD" => Some(Role::Hod),
            "ROLE_TEACHER" => Some(Role::Teacher),
            "ROLE_STUDENT" => Some(Role::Student),
            _ => None,
        }
    }

    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Hod => "ROLE_HOD",
            Role::Teacher => "ROLE_TEACHER",
            Role::Student => "ROLE_STUDENT",
        }
    }

    /// 用于界面显示的名称
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Hod => "HOD",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.authority())
    }
}

// =========================================================
// 错误
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("token is not a JWT (expected three segments)")]
    Malformed,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),
    #[error("token payload is not valid JSON: {0}")]
    Claims(String),
    #[error("token carries no authority")]
    MissingAuthority,
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    #[error("token has expired")]
    Expired,
}

// =========================================================
// 声明与会话
// =========================================================

#[derive(Debug, Deserialize)]
struct Authority {
    authority: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    authorities: Vec<Authority>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
}

/// 已登录用户的会话信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// 用户邮箱（JWT `sub`）
    pub email: String,
    pub role: Role,
    /// 过期时间（Unix 秒），缺省表示不过期
    pub expires_at: Option<i64>,
    pub issued_at: Option<i64>,
}

impl Session {
    /// 从 JWT 解码会话
    ///
    /// 角色取第一个权限 `authorities[0]`。
    pub fn from_token(token: &str) -> Result<Self, SessionError> {
        let mut segments = token.trim().split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => return Err(SessionError::Malformed),
        };

        // 部分签发方会保留 padding，统一去掉后按无 padding 解码
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| SessionError::Encoding(e.to_string()))?;

        let claims: Claims =
            serde_json::from_slice(&bytes).map_err(|e| SessionError::Claims(e.to_string()))?;

        let authority = claims
            .authorities
            .first()
            .ok_or(SessionError::MissingAuthority)?;
        let role = Role::from_authority(&authority.authority)
            .ok_or_else(|| SessionError::UnknownRole(authority.authority.clone()))?;

        Ok(Self {
            email: claims.sub,
            role,
            expires_at: claims.exp,
            issued_at: claims.iat,
        })
    }

    pub fn is_expired(&self, now_secs: i64) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now_secs)
    }

    /// 解码并检查有效期，用于从存储恢复会话
    pub fn restore(token: &str, now_secs: i64) -> Result<Self, SessionError> {
        let session = Self::from_token(token)?;
        if session.is_expired(now_secs) {
            return Err(SessionError::Expired);
        }
        Ok(session)
    }
}

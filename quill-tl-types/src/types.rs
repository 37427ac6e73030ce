//! Concrete constructors (bare types).
//!
//! `Serializable`/`Deserializable` on these read and write the fields only;
//! the boxed forms in [`crate::enums`] add the constructor id.

use crate::deserialize::{Buffer, Result};
use crate::{Deserializable, Identifiable, Serializable};

/// [`pong`](https://core.telegram.org/constructor/pong)
///
/// ```tl
/// pong#347773c5 msg_id:long ping_id:long = Pong
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pong {
    pub msg_id:  i64,
    pub ping_id: i64,
}

impl Identifiable for Pong {
    const CONSTRUCTOR_ID: u32 = 0x347773c5;
}

impl Serializable for Pong {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.msg_id.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            msg_id:  i64::deserialize(buf)?,
            ping_id: i64::deserialize(buf)?,
        })
    }
}

/// [`inputClientProxy`](https://core.telegram.org/constructor/inputClientProxy)
///
/// ```tl
/// inputClientProxy#75588b3f address:string port:int = InputClientProxy
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InputClientProxy {
    pub address: String,
    pub port:    i32,
}

impl Identifiable for InputClientProxy {
    const CONSTRUCTOR_ID: u32 = 0x75588b3f;
}

impl Serializable for InputClientProxy {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.address.serialize(buf);
        self.port.serialize(buf);
    }
}

impl Deserializable for InputClientProxy {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            address: String::deserialize(buf)?,
            port:    i32::deserialize(buf)?,
        })
    }
}

/// [`authorization`](https://core.telegram.org/constructor/authorization)
///
/// One logged-in session of the account, as listed by
/// `account.getAuthorizations`.
///
/// ```tl
/// authorization#ad01d61d flags:# current:flags.0?true official_app:flags.1?true
///     password_pending:flags.2?true encrypted_requests_disabled:flags.3?true
///     call_requests_disabled:flags.4?true unconfirmed:flags.5?true hash:long
///     device_model:string platform:string system_version:string api_id:int
///     app_name:string app_version:string date_created:int date_active:int
///     ip:string country:string region:string = Authorization
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Authorization {
    pub current:                     bool,
    pub official_app:                bool,
    pub password_pending:            bool,
    pub encrypted_requests_disabled: bool,
    pub call_requests_disabled:      bool,
    pub unconfirmed:                 bool,
    pub hash:                        i64,
    pub device_model:                String,
    pub platform:                    String,
    pub system_version:              String,
    pub api_id:                      i32,
    pub app_name:                    String,
    pub app_version:                 String,
    pub date_created:                i32,
    pub date_active:                 i32,
    pub ip:                          String,
    pub country:                     String,
    pub region:                      String,
}

impl Authorization {
    fn flags(&self) -> u32 {
        [
            self.current,
            self.official_app,
            self.password_pending,
            self.encrypted_requests_disabled,
            self.call_requests_disabled,
            self.unconfirmed,
        ]
        .iter()
        .enumerate()
        .fold(0, |acc, (bit, &set)| if set { acc | 1 << bit } else { acc })
    }
}

impl Identifiable for Authorization {
    const CONSTRUCTOR_ID: u32 = 0xad01d61d;
}

impl Serializable for Authorization {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.flags().serialize(buf);
        self.hash.serialize(buf);
        self.device_model.serialize(buf);
        self.platform.serialize(buf);
        self.system_version.serialize(buf);
        self.api_id.serialize(buf);
        self.app_name.serialize(buf);
        self.app_version.serialize(buf);
        self.date_created.serialize(buf);
        self.date_active.serialize(buf);
        self.ip.serialize(buf);
        self.country.serialize(buf);
        self.region.serialize(buf);
    }
}

impl Deserializable for Authorization {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            current:                     flags & (1 << 0) != 0,
            official_app:                flags & (1 << 1) != 0,
            password_pending:            flags & (1 << 2) != 0,
            encrypted_requests_disabled: flags & (1 << 3) != 0,
            call_requests_disabled:      flags & (1 << 4) != 0,
            unconfirmed:                 flags & (1 << 5) != 0,
            hash:                        i64::deserialize(buf)?,
            device_model:                String::deserialize(buf)?,
            platform:                    String::deserialize(buf)?,
            system_version:              String::deserialize(buf)?,
            api_id:                      i32::deserialize(buf)?,
            app_name:                    String::deserialize(buf)?,
            app_version:                 String::deserialize(buf)?,
            date_created:                i32::deserialize(buf)?,
            date_active:                 i32::deserialize(buf)?,
            ip:                          String::deserialize(buf)?,
            country:                     String::deserialize(buf)?,
            region:                      String::deserialize(buf)?,
        })
    }
}

/// [`rpc_error`](https://core.telegram.org/constructor/rpc_error)
///
/// ```tl
/// rpc_error#2144ca19 error_code:int error_message:string = RpcError
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub error_code:    i32,
    pub error_message: String,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: u32 = 0x2144ca19;
}

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.error_code.serialize(buf);
        self.error_message.serialize(buf);
    }
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            error_code:    i32::deserialize(buf)?,
            error_message: String::deserialize(buf)?,
        })
    }
}

/// [`gzip_packed`](https://core.telegram.org/mtproto/service_messages#packed-object)
///
/// ```tl
/// gzip_packed#3072cfa1 packed_data:bytes = Object
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GzipPacked {
    pub packed_data: Vec<u8>,
}

impl Identifiable for GzipPacked {
    const CONSTRUCTOR_ID: u32 = 0x3072cfa1;
}

impl Serializable for GzipPacked {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.packed_data.serialize(buf);
    }
}

impl Deserializable for GzipPacked {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { packed_data: Vec::<u8>::deserialize(buf)? })
    }
}

pub mod account {
    use crate::deserialize::{Buffer, Result};
    use crate::{Deserializable, Identifiable, Serializable};

    /// [`account.authorizations`](https://core.telegram.org/constructor/account.authorizations)
    ///
    /// ```tl
    /// account.authorizations#4bff8ea0 authorization_ttl_days:int
    ///     authorizations:Vector<Authorization> = account.Authorizations
    /// ```
    #[derive(Debug, Clone, PartialEq)]
    pub struct Authorizations {
        pub authorization_ttl_days: i32,
        pub authorizations:         Vec<crate::enums::Authorization>,
    }

    impl Identifiable for Authorizations {
        const CONSTRUCTOR_ID: u32 = 0x4bff8ea0;
    }

    impl Serializable for Authorizations {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.authorization_ttl_days.serialize(buf);
            self.authorizations.serialize(buf);
        }
    }

    impl Deserializable for Authorizations {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                authorization_ttl_days: i32::deserialize(buf)?,
                authorizations:         Vec::<crate::enums::Authorization>::deserialize(buf)?,
            })
        }
    }
}

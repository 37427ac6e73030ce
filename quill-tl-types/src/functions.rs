//! RPC functions.
//!
//! `Serializable` writes the constructor id followed by the parameters.
//! With the `deserializable-functions` feature the reverse is available too,
//! which is what a test server needs to inspect incoming requests.

#[cfg(feature = "deserializable-functions")]
use crate::deserialize::{Buffer, Error, Result, expect_id};
#[cfg(feature = "deserializable-functions")]
use crate::Deserializable;
use crate::{Identifiable, RemoteCall, Serializable, enums};

/// [`invokeWithLayer`](https://core.telegram.org/method/invokeWithLayer)
///
/// ```tl
/// invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeWithLayer<X> {
    pub layer: i32,
    pub query: X,
}

impl<X> Identifiable for InvokeWithLayer<X> {
    const CONSTRUCTOR_ID: u32 = 0xda9b0d0d;
}

impl<X: Serializable> Serializable for InvokeWithLayer<X> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.layer.serialize(buf);
        self.query.serialize(buf);
    }
}

#[cfg(feature = "deserializable-functions")]
impl<X: Deserializable> Deserializable for InvokeWithLayer<X> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self {
            layer: i32::deserialize(buf)?,
            query: X::deserialize(buf)?,
        })
    }
}

impl<X: RemoteCall> RemoteCall for InvokeWithLayer<X> {
    type Return = X::Return;
}

/// [`initConnection`](https://core.telegram.org/method/initConnection)
///
/// Carries the client identification shown in the session list.
///
/// ```tl
/// initConnection#c1cd5ea9 {X:Type} flags:# api_id:int device_model:string
///     system_version:string app_version:string system_lang_code:string
///     lang_pack:string lang_code:string proxy:flags.0?InputClientProxy
///     params:flags.1?JSONValue query:!X = X
/// ```
///
/// `params` is never sent; receiving it is reported as
/// [`Error::Unsupported`](crate::deserialize::Error::Unsupported).
#[derive(Debug, Clone, PartialEq)]
pub struct InitConnection<X> {
    pub api_id:           i32,
    pub device_model:     String,
    pub system_version:   String,
    pub app_version:      String,
    pub system_lang_code: String,
    pub lang_pack:        String,
    pub lang_code:        String,
    pub proxy:            Option<enums::InputClientProxy>,
    pub query:            X,
}

impl<X> Identifiable for InitConnection<X> {
    const CONSTRUCTOR_ID: u32 = 0xc1cd5ea9;
}

impl<X: Serializable> Serializable for InitConnection<X> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        (if self.proxy.is_some() { 1u32 << 0 } else { 0 }).serialize(buf);
        self.api_id.serialize(buf);
        self.device_model.serialize(buf);
        self.system_version.serialize(buf);
        self.app_version.serialize(buf);
        self.system_lang_code.serialize(buf);
        self.lang_pack.serialize(buf);
        self.lang_code.serialize(buf);
        self.proxy.serialize(buf);
        self.query.serialize(buf);
    }
}

#[cfg(feature = "deserializable-functions")]
impl<X: Deserializable> Deserializable for InitConnection<X> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        let flags = u32::deserialize(buf)?;
        let api_id           = i32::deserialize(buf)?;
        let device_model     = String::deserialize(buf)?;
        let system_version   = String::deserialize(buf)?;
        let app_version      = String::deserialize(buf)?;
        let system_lang_code = String::deserialize(buf)?;
        let lang_pack        = String::deserialize(buf)?;
        let lang_code        = String::deserialize(buf)?;
        let proxy = if flags & (1 << 0) != 0 {
            Some(enums::InputClientProxy::deserialize(buf)?)
        } else {
            None
        };
        if flags & (1 << 1) != 0 {
            return Err(Error::Unsupported("initConnection.params"));
        }
        Ok(Self {
            api_id,
            device_model,
            system_version,
            app_version,
            system_lang_code,
            lang_pack,
            lang_code,
            proxy,
            query: X::deserialize(buf)?,
        })
    }
}

impl<X: RemoteCall> RemoteCall for InitConnection<X> {
    type Return = X::Return;
}

/// [`ping`](https://core.telegram.org/method/ping)
///
/// ```tl
/// ping#7abe77ec ping_id:long = Pong
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub ping_id: i64,
}

impl Identifiable for Ping {
    const CONSTRUCTOR_ID: u32 = 0x7abe77ec;
}

impl Serializable for Ping {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

#[cfg(feature = "deserializable-functions")]
impl Deserializable for Ping {
    fn deserialize(buf: Buffer) -> Result<Self> {
        expect_id(buf, Self::CONSTRUCTOR_ID)?;
        Ok(Self { ping_id: i64::deserialize(buf)? })
    }
}

impl RemoteCall for Ping {
    type Return = enums::Pong;
}

/// Parameterless functions share one shape.
macro_rules! unit_call {
    ($(#[$doc:meta])* $name:ident = $id:literal => $ret:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {}

        impl Identifiable for $name {
            const CONSTRUCTOR_ID: u32 = $id;
        }

        impl Serializable for $name {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                Self::CONSTRUCTOR_ID.serialize(buf);
            }
        }

        #[cfg(feature = "deserializable-functions")]
        impl Deserializable for $name {
            fn deserialize(buf: Buffer) -> Result<Self> {
                expect_id(buf, Self::CONSTRUCTOR_ID)?;
                Ok(Self {})
            }
        }

        impl RemoteCall for $name {
            type Return = $ret;
        }
    };
}

pub mod help {
    #[cfg(feature = "deserializable-functions")]
    use crate::deserialize::{Buffer, Result, expect_id};
    #[cfg(feature = "deserializable-functions")]
    use crate::Deserializable;
    use crate::{Identifiable, RemoteCall, Serializable};

    unit_call! {
        /// [`help.getConfig`](https://core.telegram.org/method/help.getConfig)
        ///
        /// The `Config` answer is passed through undecoded.
        GetConfig = 0xc4f9186b => crate::Blob
    }
}

pub mod account {
    #[cfg(feature = "deserializable-functions")]
    use crate::deserialize::{Buffer, Result, expect_id};
    #[cfg(feature = "deserializable-functions")]
    use crate::Deserializable;
    use crate::{Identifiable, RemoteCall, Serializable};

    unit_call! {
        /// [`account.getAuthorizations`](https://core.telegram.org/method/account.getAuthorizations)
        ///
        /// Lists every session logged into the account.
        GetAuthorizations = 0xe320c158 => crate::enums::account::Authorizations
    }

    /// [`account.resetAuthorization`](https://core.telegram.org/method/account.resetAuthorization)
    ///
    /// ```tl
    /// account.resetAuthorization#df77f3bc hash:long = Bool
    /// ```
    #[derive(Debug, Clone, PartialEq)]
    pub struct ResetAuthorization {
        pub hash: i64,
    }

    impl Identifiable for ResetAuthorization {
        const CONSTRUCTOR_ID: u32 = 0xdf77f3bc;
    }

    impl Serializable for ResetAuthorization {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.hash.serialize(buf);
        }
    }

    #[cfg(feature = "deserializable-functions")]
    impl Deserializable for ResetAuthorization {
        fn deserialize(buf: Buffer) -> Result<Self> {
            expect_id(buf, Self::CONSTRUCTOR_ID)?;
            Ok(Self { hash: i64::deserialize(buf)? })
        }
    }

    impl RemoteCall for ResetAuthorization {
        type Return = bool;
    }
}

pub mod auth {
    #[cfg(feature = "deserializable-functions")]
    use crate::deserialize::{Buffer, Result, expect_id};
    #[cfg(feature = "deserializable-functions")]
    use crate::Deserializable;
    use crate::{Identifiable, RemoteCall, Serializable};

    unit_call! {
        /// [`auth.resetAuthorizations`](https://core.telegram.org/method/auth.resetAuthorizations)
        ///
        /// Terminates every session except the current one.
        ResetAuthorizations = 0x9fab0d1a => bool
    }
}

//! Boxed types: constructor id followed by the bare fields.

use crate::deserialize::{Buffer, Error, Result};
use crate::{Deserializable, Identifiable, Serializable, types};

macro_rules! boxed {
    ($(#[$doc:meta])* $name:ident => $($variant:ident($ty:ty)),+ $(,)?) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($ty),)+
        }

        impl Serializable for $name {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                match self {
                    $(Self::$variant(x) => {
                        <$ty as Identifiable>::CONSTRUCTOR_ID.serialize(buf);
                        x.serialize(buf);
                    })+
                }
            }
        }

        impl Deserializable for $name {
            fn deserialize(buf: Buffer) -> Result<Self> {
                let id = u32::deserialize(buf)?;
                $(if id == <$ty as Identifiable>::CONSTRUCTOR_ID {
                    return Ok(Self::$variant(<$ty as Deserializable>::deserialize(buf)?));
                })+
                Err(Error::UnexpectedConstructor { id })
            }
        }

        $(impl From<$ty> for $name {
            fn from(x: $ty) -> Self { Self::$variant(x) }
        })+
    };
}

boxed! {
    /// [`Pong`](https://core.telegram.org/type/Pong)
    Pong => Pong(types::Pong)
}

boxed! {
    /// [`InputClientProxy`](https://core.telegram.org/type/InputClientProxy)
    InputClientProxy => InputClientProxy(types::InputClientProxy)
}

boxed! {
    /// [`Authorization`](https://core.telegram.org/type/Authorization)
    Authorization => Authorization(types::Authorization)
}

boxed! {
    /// [`RpcError`](https://core.telegram.org/type/RpcError)
    RpcError => RpcError(types::RpcError)
}

pub mod account {
    use crate::deserialize::{Buffer, Error, Result};
    use crate::{Deserializable, Identifiable, Serializable, types};

    boxed! {
        /// [`account.Authorizations`](https://core.telegram.org/type/account.Authorizations)
        Authorizations => Authorizations(types::account::Authorizations)
    }
}

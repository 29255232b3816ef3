/// Lets an element and its builder expose the shared `Metadata` parts
/// through `Deref`.
macro_rules! impl_metadata {
    ($t:ty, $builder:ty) => {
        impl ::std::ops::Deref for $t {
            type Target = $crate::feed::Metadata;
            fn deref(&self) -> &$crate::feed::Metadata { &self.metadata }
        }

        impl ::std::ops::Deref for $builder {
            type Target = $crate::feed::MetadataBuilder;
            fn deref(&self) -> &$crate::feed::MetadataBuilder { &self.metadata }
        }

        impl ::std::ops::DerefMut for $builder {
            fn deref_mut(&mut self) -> &mut $crate::feed::MetadataBuilder { &mut self.metadata }
        }
    }
}

use std::any::Any;

/// Trait for data attached to an entity.
/// Components are stored type-erased and recovered by downcasting.
pub trait Component: Send + 'static {
    /// Returns a reference to the component as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to the component as Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Implements [`Component`] for plain data types.
macro_rules! impl_component {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::core::component::Component for $ty {
                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }
            }
        )*
    };
}

pub(crate) use impl_component;

/// Downcast a stored component to its concrete type
pub fn downcast_component<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

/// Downcast a stored component to its concrete type, mutably
pub fn downcast_component_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}

impl_component!(super::types::Name, super::types::Position);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Name, Position};

    #[test]
    fn test_downcast_to_correct_type() {
        let boxed: Box<dyn Component> = Box::new(Name("Queue1".to_string()));
        let name = downcast_component::<Name>(boxed.as_ref()).unwrap();
        assert_eq!(name.0, "Queue1");
    }

    #[test]
    fn test_downcast_to_wrong_type_fails() {
        let boxed: Box<dyn Component> = Box::new(Position::new(1.0, 2.0, 3.0));
        assert!(downcast_component::<Name>(boxed.as_ref()).is_none());
    }

    #[test]
    fn test_downcast_mut_updates_value() {
        let mut boxed: Box<dyn Component> = Box::new(Position::default());
        downcast_component_mut::<Position>(boxed.as_mut()).unwrap().x = 5.0;
        assert_eq!(downcast_component::<Position>(boxed.as_ref()).unwrap().x, 5.0);
    }
}

//! Boilerplate operator implementations for single-field tuple structs.

#[macro_export]
macro_rules! op {
    (binary $t:ty, $op:ident, $method:ident) => {
        impl $op for $t {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(self.value().$method(rhs.value()))
            }
        }
    };
    (inplace $t:ty, $op:ident, $method:ident) => {
        impl $op for $t {
            fn $method(&mut self, rhs: Self) {
                self.0.$method(rhs.value())
            }
        }
    };
    (unary $t:ty, $op:ident, $method:ident) => {
        impl $op for $t {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(self.value().$method())
            }
        }
    };
}

use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);

        function allowance(address owner, address spender) external view returns (uint256);

        function approve(address spender, uint256 amount) external returns (bool);
    }
}
